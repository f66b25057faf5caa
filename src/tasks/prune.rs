//! TTL Prune Task
//!
//! Background task that periodically removes expired cache entries, so memory
//! is reclaimed even for keys that are never read again.

use std::sync::Weak;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::BoundedStore;

/// Shortest sweep interval, however small the max age.
const MIN_PRUNE_INTERVAL: Duration = Duration::from_millis(1);

/// Sweep interval for a given max age: half of it, never below 1ms.
pub fn prune_interval(max_age: Duration) -> Duration {
    (max_age / 2).max(MIN_PRUNE_INTERVAL)
}

/// Spawns a background task that periodically prunes expired entries.
///
/// The task only holds a weak reference to the store and exits on its own
/// once the store has been dropped. Abort the returned handle to stop it
/// earlier.
///
/// # Example
/// ```ignore
/// let store = Arc::new(Mutex::new(BoundedStore::<String>::new(1000, Some(ttl))?));
/// let handle = spawn_prune_task(Arc::downgrade(&store), prune_interval(ttl));
/// // Later, on close:
/// handle.abort();
/// ```
pub fn spawn_prune_task<V>(
    store: Weak<Mutex<BoundedStore<V>>>,
    interval: Duration,
) -> JoinHandle<()>
where
    V: Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(
            "Starting cache prune task with interval of {} ms",
            interval.as_millis()
        );

        loop {
            tokio::time::sleep(interval).await;

            let Some(store) = store.upgrade() else {
                break;
            };
            let removed = store.lock().prune_expired();

            if removed > 0 {
                debug!("Cache prune: removed {} expired entries", removed);
            }
        }

        info!("Cache dropped, prune task exiting");
    })
}
