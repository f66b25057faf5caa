//! Background Tasks Module
//!
//! Contains background tasks owned by a cache store.
//!
//! # Tasks
//! - TTL Prune: Removes expired cache entries every half max age

mod prune;

pub use prune::{prune_interval, spawn_prune_task};
