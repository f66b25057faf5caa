//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with expiry support.

use std::sync::Arc;
use std::time::{Duration, Instant};

// == Cache Entry ==
/// A stored value together with the instant it was last refreshed.
#[derive(Debug)]
pub struct CacheEntry<V> {
    /// The stored value, shared with callers
    pub value: Arc<V>,
    /// Last `set` of this key; TTL counts down from here
    pub refreshed_at: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry refreshed now.
    pub fn new(value: Arc<V>) -> Self {
        Self {
            value,
            refreshed_at: Instant::now(),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has outlived `max_age`.
    ///
    /// An entry is expired once the elapsed time is greater than or equal to
    /// the max age. With no max age the entry never expires.
    pub fn is_expired(&self, max_age: Option<Duration>) -> bool {
        match max_age {
            Some(max_age) => self.refreshed_at.elapsed() >= max_age,
            None => false,
        }
    }
}
