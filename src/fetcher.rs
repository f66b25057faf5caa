//! Fetcher Module
//!
//! A get-or-compute adapter with its compute function bound once.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;

use crate::error::CacheError;
use crate::store::CacheStore;

/// A compute function bound to a [`CacheStore`].
///
/// Each [`Fetcher::get`] behaves exactly like [`CacheStore::dynamic_get`]
/// with the bound function. Holds nothing besides the function and a handle
/// to the parent cache.
pub struct Fetcher<K, V, F> {
    cache: CacheStore<K, V>,
    compute: F,
}

impl<K, V, F> Fetcher<K, V, F>
where
    K: Serialize,
    V: Send + Sync + 'static,
{
    pub(crate) fn new(cache: CacheStore<K, V>, compute: F) -> Self {
        Self { cache, compute }
    }

    /// Returns the cached value for `key`, running the bound function on a miss.
    pub async fn get<Fut, E>(&self, key: K) -> Result<Option<Arc<V>>, E>
    where
        F: Fn(K) -> Fut,
        Fut: Future<Output = Result<Option<V>, E>>,
        E: From<CacheError>,
    {
        self.cache.dynamic_get(key, &self.compute).await
    }

    /// The cache this fetcher reads from and populates.
    pub fn cache(&self) -> &CacheStore<K, V> {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use crate::config::CacheConfig;
    use crate::store::CacheStore;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_fetcher_shares_parent_cache() {
        let cache: CacheStore<u32, String> = CacheStore::new(CacheConfig::default()).unwrap();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        let fetcher = cache.fetcher(move |key: u32| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move { Ok::<_, anyhow::Error>(Some(format!("value-{}", key))) }
        });

        assert_eq!(fetcher.get(7).await.unwrap().as_deref(), Some(&"value-7".to_string()));
        assert_eq!(fetcher.get(7).await.unwrap().as_deref(), Some(&"value-7".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Visible through the parent
        assert_eq!(cache.get(&7).unwrap().as_deref(), Some(&"value-7".to_string()));
        assert_eq!(fetcher.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_fetcher_uses_existing_entries() {
        let cache: CacheStore<u32, String> = CacheStore::new(CacheConfig::default()).unwrap();
        cache.set(&1, "preset".to_string()).unwrap();

        let fetcher = cache.fetcher(|_key: u32| async {
            Err::<Option<String>, _>(anyhow::anyhow!("should not be called"))
        });

        assert_eq!(fetcher.get(1).await.unwrap().as_deref(), Some(&"preset".to_string()));
        assert!(fetcher.get(2).await.is_err());
    }

    #[tokio::test]
    async fn test_fetcher_failure_recomputed_next_call() {
        let cache: CacheStore<u32, String> = CacheStore::new(CacheConfig::default()).unwrap();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        let fetcher = cache.fetcher(move |key: u32| {
            let attempt = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    Err(anyhow::anyhow!("upstream timeout"))
                } else {
                    Ok(Some(format!("value-{}", key)))
                }
            }
        });

        let err = fetcher.get(3).await.unwrap_err();
        assert_eq!(err.to_string(), "upstream timeout");
        assert!(cache.get(&3).unwrap().is_none(), "failure must not be cached");

        assert_eq!(fetcher.get(3).await.unwrap().as_deref(), Some(&"value-3".to_string()));
        assert_eq!(fetcher.get(3).await.unwrap().as_deref(), Some(&"value-3".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
