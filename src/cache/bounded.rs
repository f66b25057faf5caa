//! Bounded Store Module
//!
//! Capacity- and TTL-bounded map combining HashMap storage with LRU tracking.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, trace};

use crate::cache::{CacheEntry, CacheStats, LruTracker};
use crate::error::{CacheError, Result};

// == Bounded Store ==
/// Key-value storage keyed by canonical strings, with LRU eviction and
/// lazy TTL expiry.
///
/// `len() <= capacity` holds after every operation.
#[derive(Debug)]
pub struct BoundedStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
    /// Entry lifetime since its last `set`, None = no expiration
    max_age: Option<Duration>,
}

impl<V> BoundedStore<V> {
    // == Constructor ==
    /// Creates a new BoundedStore.
    ///
    /// # Errors
    /// `CacheError::InvalidConfig` when `capacity` is zero.
    pub fn new(capacity: usize, max_age: Option<Duration>) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidConfig(
                "capacity must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            capacity,
            max_age,
        })
    }

    // == Set ==
    /// Stores a value, overwriting any previous one for the key.
    ///
    /// The entry becomes most recently used and its TTL restarts. Inserting a
    /// new key into a full store evicts the least recently used entry first.
    pub fn set(&mut self, key: String, value: Arc<V>) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            if let Some(evicted_key) = self.lru.evict_oldest() {
                self.entries.remove(&evicted_key);
                self.stats.record_eviction();
                debug!(key = %evicted_key, "evicted least recently used entry");
            }
        }

        self.lru.touch(&key);
        self.entries.insert(key, CacheEntry::new(value));
        self.stats.set_total_entries(self.entries.len());
        debug_assert_eq!(self.lru.len(), self.entries.len());
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// A hit makes the entry most recently used. Expired entries are removed
    /// and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<Arc<V>> {
        let Some(entry) = self.entries.get(key) else {
            self.stats.record_miss();
            return None;
        };

        if entry.is_expired(self.max_age) {
            self.entries.remove(key);
            self.lru.remove(key);
            self.stats.record_miss();
            self.stats.record_expirations(1);
            self.stats.set_total_entries(self.entries.len());
            trace!(key, "entry expired on access");
            return None;
        }

        let value = Arc::clone(&entry.value);
        self.stats.record_hit();
        self.lru.touch(key);
        Some(value)
    }

    // == Remove ==
    /// Removes an entry by key, returning its value if it was resident.
    pub fn remove(&mut self, key: &str) -> Option<Arc<V>> {
        let entry = self.entries.remove(key)?;
        self.lru.remove(key);
        self.stats.set_total_entries(self.entries.len());
        Some(entry.value)
    }

    // == Prune Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed. A no-op without a max age.
    pub fn prune_expired(&mut self) -> usize {
        if self.max_age.is_none() {
            return 0;
        }

        let max_age = self.max_age;
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(max_age))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        self.stats.record_expirations(expired_keys.len());
        self.stats.set_total_entries(self.entries.len());
        expired_keys.len()
    }

    // == Clear ==
    /// Removes every entry. Statistics counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.stats.set_total_entries(0);
    }

    // == Stats ==
    /// Returns current statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Returns the number of resident entries, including expired ones not yet discovered.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
