//! Keyed, timer-based coalescing of rapid writes.
//!
//! Each push replaces any value still pending for the same key and restarts the
//! key's timer. Only the last value pushed within the delay window is applied.
//! A drain waits for timers that are already applying a value, so once it
//! returns every value pushed before it has either been applied or drained.

use std::{
    collections::HashMap,
    future::Future,
    hash::Hash,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio::sync::{Mutex, RwLock};

struct Pending<V> {
    generation: u64,
    value: V,
}

/// Coalesces values pushed under the same key within `delay`.
///
/// Cloning shares the pending set, so a clone can drain values pushed through
/// the original.
pub struct Debouncer<K, V> {
    delay: Duration,
    generation: Arc<AtomicU64>,
    pending: Arc<Mutex<HashMap<K, Pending<V>>>>,
    /// Held shared by timers while they take and apply a value, exclusively by drains.
    applying: Arc<RwLock<()>>,
}

impl<K, V> Clone for Debouncer<K, V> {
    fn clone(&self) -> Self {
        Self {
            delay: self.delay,
            generation: self.generation.clone(),
            pending: self.pending.clone(),
            applying: self.applying.clone(),
        }
    }
}

impl<K, V> Debouncer<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Send + 'static,
{
    /// Creates a debouncer that applies a key's value once no newer value has
    /// been pushed for `delay`.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
            pending: Arc::new(Mutex::new(HashMap::new())),
            applying: Arc::new(RwLock::new(())),
        }
    }

    /// Queues `value` under `key`, superseding any pending value for that key.
    ///
    /// After the delay elapses without another push for the same key, `apply` is
    /// called with the key and the last value. A value that was drained in the
    /// meantime is never applied.
    ///
    /// # Arguments
    /// - `key` - Coalescing key
    /// - `value` - Value to apply
    /// - `apply` - Async callback run on the Tokio runtime when the timer fires
    pub async fn push<F, Fut>(&self, key: K, value: V, apply: F)
    where
        F: FnOnce(K, V) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;

        self.pending
            .lock()
            .await
            .insert(key.clone(), Pending { generation, value });

        let pending = self.pending.clone();
        let applying = self.applying.clone();
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let _applying = applying.read().await;
            let value = {
                let mut pending = pending.lock().await;
                match pending.get(&key) {
                    Some(entry) if entry.generation == generation => {
                        pending.remove(&key).map(|entry| entry.value)
                    }
                    _ => None,
                }
            };

            if let Some(value) = value {
                apply(key, value).await;
            }
        });
    }

    /// Removes and returns every pending value whose key matches `predicate`.
    ///
    /// Drained values are never applied by their timers; the caller takes
    /// responsibility for applying them. Waits for any timer currently applying
    /// a value to finish first.
    pub async fn drain_matching(&self, predicate: impl Fn(&K) -> bool) -> Vec<(K, V)> {
        let _applying = self.applying.write().await;
        let mut pending = self.pending.lock().await;

        let keys: Vec<K> = pending.keys().filter(|key| predicate(key)).cloned().collect();

        keys.into_iter()
            .filter_map(|key| pending.remove(&key).map(|entry| (key, entry.value)))
            .collect()
    }

    /// Number of pending values whose key matches `predicate`.
    pub async fn pending_matching(&self, predicate: impl Fn(&K) -> bool) -> usize {
        self.pending
            .lock()
            .await
            .keys()
            .filter(|key| predicate(key))
            .count()
    }
}
