//! Keyed deduplication of in-flight loads
//!
//! At most one computation per key is ever started; concurrent callers for
//! the same key share the result.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use futures::FutureExt;
use futures::channel::oneshot;
use futures::future::{BoxFuture, Shared};
use tracing::debug;

use crate::LoadError;

type SharedLoad<V> = Shared<BoxFuture<'static, Result<V, LoadError>>>;

struct EntrySlot<V> {
    generation: u64,
    load: SharedLoad<V>,
}

/// Counters describing cache behavior
#[derive(Debug, Clone, Copy, Default)]
pub struct DedupStats {
    /// Total `get_or_load` calls
    pub gets: u64,
    /// Calls satisfied by an existing in-flight or completed entry
    pub shared: u64,
    /// Computations actually started
    pub started: u64,
    /// Computations that ended in failure
    pub failed: u64,
}

impl DedupStats {
    /// Fraction of calls that avoided a computation
    pub fn share_rate(&self) -> f64 {
        if self.gets == 0 {
            0.0
        } else {
            self.shared as f64 / self.gets as f64
        }
    }
}

/// Cache mapping keys to shared in-flight-or-completed computations.
///
/// The check-or-register step is the only mutually exclusive section; the
/// computation itself runs on the global executor outside the lock, so slow
/// loads never block lookups for other keys. Abandoned callers do not cancel
/// a load: it runs to completion or failure regardless.
pub struct DedupCache<V: Clone + Send + Sync + 'static> {
    entries: Arc<Mutex<HashMap<String, EntrySlot<V>>>>,
    generations: AtomicU64,
    stats: Arc<Mutex<DedupStats>>,
}

impl<V: Clone + Send + Sync + 'static> DedupCache<V> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            generations: AtomicU64::new(0),
            stats: Arc::new(Mutex::new(DedupStats::default())),
        }
    }

    /// Return the entry for `key`, starting `compute` only if none exists.
    ///
    /// A failure evicts the key so a later call retries from scratch; every
    /// awaiter of the failed computation receives the same error.
    pub async fn get_or_load<F, Fut>(&self, key: &str, compute: F) -> Result<V, LoadError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, LoadError>> + Send + 'static,
    {
        let (load, work) = {
            let mut entries = self.entries.lock().unwrap();
            let mut stats = self.stats.lock().unwrap();
            stats.gets += 1;

            if let Some(slot) = entries.get(key) {
                stats.shared += 1;
                debug!(key, "joined existing load");
                (slot.load.clone(), None)
            } else {
                stats.started += 1;
                let generation = self.generations.fetch_add(1, Ordering::Relaxed);
                // The entry is published before the computation is spawned,
                // so the failure eviction below can never run against a map
                // that does not yet hold it.
                let (sender, receiver) = oneshot::channel::<Result<V, LoadError>>();
                let load: SharedLoad<V> = receiver
                    .map(|received| match received {
                        Ok(result) => result,
                        Err(_canceled) => {
                            Err(LoadError::Network("load task dropped".to_string()))
                        }
                    })
                    .boxed()
                    .shared();
                debug!(key, "registered load");
                entries.insert(
                    key.to_string(),
                    EntrySlot {
                        generation,
                        load: load.clone(),
                    },
                );

                let future = compute();
                let map = Arc::clone(&self.entries);
                let task_stats = Arc::clone(&self.stats);
                let owner_key = key.to_string();
                let task_load = load.clone();
                let work = async move {
                    let result = future.await;
                    if result.is_err() {
                        // Evict only our own registration; a clear() plus
                        // re-register between start and failure must not be
                        // clobbered.
                        let mut entries = map.lock().unwrap();
                        let owned = entries
                            .get(&owner_key)
                            .is_some_and(|slot| slot.generation == generation);
                        if owned {
                            entries.remove(&owner_key);
                        }
                        drop(entries);
                        task_stats.lock().unwrap().failed += 1;
                    }
                    let _ = sender.send(result);
                    // Drive the shared future to completion so peek() sees
                    // the value even when every awaiter has gone away.
                    let _ = task_load.now_or_never();
                };
                (load, Some(work))
            }
        };

        if let Some(work) = work {
            smol::spawn(work).detach();
        }
        load.await
    }

    /// Non-blocking look at a completed entry.
    pub fn peek(&self, key: &str) -> Option<Result<V, LoadError>> {
        let entries = self.entries.lock().unwrap();
        entries.get(key).and_then(|slot| slot.load.peek().cloned())
    }

    /// Whether the key has an in-flight or completed entry
    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    /// Drop every entry. In-flight loads still complete for their current
    /// awaiters but are no longer findable, so the next call recomputes.
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }

    pub fn stats(&self) -> DedupStats {
        *self.stats.lock().unwrap()
    }
}

impl<V: Clone + Send + Sync + 'static> Default for DedupCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
