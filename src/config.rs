//! Configuration Module
//!
//! Capacity and expiry settings for a cache store, with environment loading.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

/// Default maximum number of entries.
pub const DEFAULT_SIZE: usize = 1000;

/// Cache configuration parameters.
///
/// Immutable once handed to a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold
    #[serde(default = "default_size")]
    pub size: usize,
    /// Maximum age of an entry in milliseconds, None or 0 = no expiration
    #[serde(default)]
    pub max_age_ms: Option<u64>,
}

fn default_size() -> usize {
    DEFAULT_SIZE
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_SIZE` - Maximum cache entries (default: 1000)
    /// - `CACHE_MAX_AGE_MS` - Entry time-to-live in milliseconds (default: none)
    pub fn from_env() -> Self {
        Self {
            size: env::var("CACHE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SIZE),
            max_age_ms: env::var("CACHE_MAX_AGE_MS")
                .ok()
                .and_then(|v| v.parse().ok()),
        }
    }

    /// Returns a copy with the given capacity.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Returns a copy with the given time-to-live.
    ///
    /// Sub-millisecond durations round up to 1ms so they still expire, and
    /// durations beyond `u64::MAX` ms saturate. `Duration::ZERO` disables expiry.
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        let ms = if max_age.is_zero() {
            0
        } else {
            u64::try_from(max_age.as_millis())
                .unwrap_or(u64::MAX)
                .max(1)
        };
        self.max_age_ms = Some(ms);
        self
    }

    /// Effective time-to-live. A zero max age disables expiry.
    pub fn max_age(&self) -> Option<Duration> {
        self.max_age_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }

    /// Rejects configurations a store cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(CacheError::InvalidConfig(
                "size must be a positive number of entries".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            max_age_ms: None,
        }
    }
}
