//! Cache Store Module
//!
//! Public facade: canonical key normalization in front of a bounded store,
//! plus the asynchronous get-or-compute operation.

use std::borrow::Borrow;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

use crate::cache::{BoundedStore, CacheStats};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::fetcher::Fetcher;
use crate::key::normalize_key;
use crate::tasks::{prune_interval, spawn_prune_task};

// == Cache Store ==
/// Bounded memoizing cache from structured keys `K` to shared values `V`.
///
/// Keys are normalized to canonical strings, so structurally equal keys hit
/// the same slot. Values are stored once and handed out as `Arc<V>`.
///
/// `CacheStore` is a cheap handle: clones share the same entries. When a
/// max age is configured and a tokio runtime is running, construction also
/// starts a background sweep that is stopped by [`CacheStore::close`] or when
/// the last handle is dropped.
///
/// Concurrent misses on the same key are not coalesced: each caller runs its
/// own computation and the last one to finish overwrites the stored value.
pub struct CacheStore<K, V> {
    shared: Arc<Shared<V>>,
    _key: PhantomData<fn(&K)>,
}

struct Shared<V> {
    store: Arc<Mutex<BoundedStore<V>>>,
    pruner: Mutex<Option<JoinHandle<()>>>,
    config: CacheConfig,
}

impl<V> Drop for Shared<V> {
    fn drop(&mut self) {
        if let Some(handle) = self.pruner.get_mut().take() {
            handle.abort();
        }
    }
}

impl<K, V> Clone for CacheStore<K, V> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            _key: PhantomData,
        }
    }
}

impl<K, V> std::fmt::Debug for CacheStore<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("config", &self.shared.config)
            .field("len", &self.shared.store.lock().len())
            .finish()
    }
}

impl<K, V> CacheStore<K, V>
where
    K: Serialize,
    V: Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a new CacheStore from `config`.
    ///
    /// # Errors
    /// `CacheError::InvalidConfig` when the configured size is zero.
    pub fn new(config: CacheConfig) -> Result<Self> {
        config.validate()?;

        let max_age = config.max_age();
        let store = Arc::new(Mutex::new(BoundedStore::new(config.size, max_age)?));

        let pruner = match (max_age, Handle::try_current()) {
            (Some(max_age), Ok(_)) => Some(spawn_prune_task(
                Arc::downgrade(&store),
                prune_interval(max_age),
            )),
            (Some(_), Err(_)) => {
                debug!("No tokio runtime, expired entries are only dropped on access");
                None
            }
            (None, _) => None,
        };

        Ok(Self {
            shared: Arc::new(Shared {
                store,
                pruner: Mutex::new(pruner),
                config,
            }),
            _key: PhantomData,
        })
    }

    // == Set ==
    /// Stores `value` under `key`, overwriting any previous value.
    pub fn set<Q>(&self, key: &Q, value: V) -> Result<()>
    where
        K: Borrow<Q>,
        Q: Serialize + ?Sized,
    {
        let canonical = normalize_key(key)?;
        self.shared.store.lock().set(canonical, Arc::new(value));
        Ok(())
    }

    // == Get ==
    /// Returns the live value for `key`, if any. Never suspends.
    pub fn get<Q>(&self, key: &Q) -> Result<Option<Arc<V>>>
    where
        K: Borrow<Q>,
        Q: Serialize + ?Sized,
    {
        let canonical = normalize_key(key)?;
        Ok(self.shared.store.lock().get(&canonical))
    }

    // == Remove ==
    /// Drops the entry for `key`, returning its value if it was resident.
    pub fn remove<Q>(&self, key: &Q) -> Result<Option<Arc<V>>>
    where
        K: Borrow<Q>,
        Q: Serialize + ?Sized,
    {
        let canonical = normalize_key(key)?;
        Ok(self.shared.store.lock().remove(&canonical))
    }

    // == Dynamic Get ==
    /// Returns the cached value for `key`, computing and storing it on a miss.
    ///
    /// `compute` runs only when the key is absent or expired. A `Some` result
    /// is stored before being returned; `None` is returned without touching
    /// the cache. Synchronous producers can return `std::future::ready(..)`
    /// or an `async` block.
    ///
    /// The store never cancels `compute`, but it runs inside the returned
    /// future: dropping that future before it completes drops the pending
    /// computation too, and nothing is stored. Spawn the call onto a task if
    /// the value should land in the cache even when the caller gives up.
    ///
    /// # Errors
    /// A compute failure is returned unchanged and nothing is stored, so the
    /// next call for the key computes again. Key normalization failures are
    /// converted into `E`.
    pub async fn dynamic_get<F, Fut, E>(
        &self,
        key: K,
        compute: F,
    ) -> std::result::Result<Option<Arc<V>>, E>
    where
        F: FnOnce(K) -> Fut,
        Fut: Future<Output = std::result::Result<Option<V>, E>>,
        E: From<CacheError>,
    {
        let canonical = normalize_key(&key)?;

        if let Some(value) = self.lookup(&canonical) {
            trace!(key = %canonical, "memoized value hit");
            return Ok(Some(value));
        }

        debug!(key = %canonical, "cache miss, computing value");
        let computed = match compute(key).await {
            Ok(computed) => computed,
            Err(err) => {
                debug!(key = %canonical, "compute failed, cache left untouched");
                return Err(err);
            }
        };

        match computed {
            Some(value) => {
                let value = Arc::new(value);
                self.shared.store.lock().set(canonical, Arc::clone(&value));
                Ok(Some(value))
            }
            None => {
                debug!(key = %canonical, "compute produced no value, nothing stored");
                Ok(None)
            }
        }
    }

    // == Fetcher ==
    /// Binds `compute` to this cache for repeated get-or-compute calls.
    pub fn fetcher<F>(&self, compute: F) -> Fetcher<K, V, F> {
        Fetcher::new(self.clone(), compute)
    }

    // == Close ==
    /// Stops the background sweep and removes all entries.
    ///
    /// Safe to call repeatedly. The cache stays usable afterwards, relying on
    /// lazy expiry only.
    pub fn close(&self) {
        if let Some(handle) = self.shared.pruner.lock().take() {
            handle.abort();
            info!("Cache closed, prune task stopped");
        }
        self.shared.store.lock().clear();
    }

    // == Prune ==
    /// Removes expired entries now. Returns the number removed.
    pub fn prune(&self) -> usize {
        self.shared.store.lock().prune_expired()
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.shared.store.lock().stats()
    }

    /// Number of resident entries, including expired ones not swept yet.
    pub fn len(&self) -> usize {
        self.shared.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.store.lock().is_empty()
    }

    pub fn config(&self) -> &CacheConfig {
        &self.shared.config
    }

    fn lookup(&self, canonical: &str) -> Option<Arc<V>> {
        self.shared.store.lock().get(canonical)
    }

    #[cfg(test)]
    fn has_pruner(&self) -> bool {
        self.shared.pruner.lock().is_some()
    }
}
