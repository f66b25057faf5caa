//! Memo Cache - A bounded in-memory memoizing cache
//!
//! Maps structured keys to shared values with LRU eviction, optional TTL
//! expiration, and an asynchronous get-or-compute layer.

mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod key;
pub mod store;
mod tasks;

pub use cache::CacheStats;
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use fetcher::Fetcher;
pub use key::normalize_key;
pub use store::CacheStore;
