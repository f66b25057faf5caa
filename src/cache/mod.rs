//! Cache Module
//!
//! Provides bounded in-memory storage with TTL expiration and LRU eviction.

mod bounded;
mod entry;
mod lru;
mod stats;


pub(crate) use bounded::BoundedStore;
pub(crate) use entry::CacheEntry;
pub(crate) use lru::LruTracker;
pub use stats::CacheStats;
