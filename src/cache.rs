//! Explicit memoization store shared by the fetcher and the aggregator.
//!
//! Each key owns a `OnceLock` cell. The map lock is only held long enough to
//! find or create the cell; the value is computed inside `get_or_init`, so
//! concurrent callers for one key wait on a single computation while other
//! keys proceed.

use ahash::AHashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use crate::models::{FleetSnapshot, IndicatorSeries};

/// (iso3, indicator) -> cleaned series.
pub type SeriesCache = OnceCache<(String, String), Arc<IndicatorSeries>>;
/// indicator -> fleet snapshot.
pub type SnapshotCache = OnceCache<String, Arc<FleetSnapshot>>;

#[derive(Debug)]
pub struct OnceCache<K, V> {
    cells: Mutex<AHashMap<K, Arc<OnceLock<V>>>>,
}

impl<K, V> Default for OnceCache<K, V> {
    fn default() -> Self {
        Self {
            cells: Mutex::new(AHashMap::new()),
        }
    }
}

impl<K: Eq + Hash, V: Clone> OnceCache<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic inside `init` never leaves the map half-written, so a poisoned
    // lock is still safe to reuse.
    fn lock(&self) -> MutexGuard<'_, AHashMap<K, Arc<OnceLock<V>>>> {
        self.cells.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Return the cached value for `key`, computing it with `init` if absent.
    pub fn get_or_insert_with<F: FnOnce() -> V>(&self, key: K, init: F) -> V {
        let cell = Arc::clone(self.lock().entry(key).or_default());
        cell.get_or_init(init).clone()
    }

    /// Cached value, if one has been computed.
    pub fn get(&self, key: &K) -> Option<V> {
        self.lock().get(key).and_then(|cell| cell.get().cloned())
    }

    /// Number of computed entries.
    pub fn len(&self) -> usize {
        self.lock().values().filter(|c| c.get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn computes_once_per_key() {
        let cache: OnceCache<String, usize> = OnceCache::new();
        let calls = AtomicUsize::new(0);
        for _ in 0..3 {
            let v = cache.get_or_insert_with("a".into(), || {
                calls.fetch_add(1, Ordering::SeqCst);
                7
            });
            assert_eq!(v, 7);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.get(&"a".to_string()), Some(7));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn concurrent_callers_share_one_computation() {
        let cache: OnceCache<u32, u32> = OnceCache::new();
        let calls = AtomicUsize::new(0);
        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    cache.get_or_insert_with(1, || {
                        calls.fetch_add(1, Ordering::SeqCst);
                        std::thread::sleep(std::time::Duration::from_millis(20));
                        42
                    })
                });
            }
        });
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.get(&1), Some(42));
    }

    #[test]
    fn clear_forgets_values() {
        let cache: OnceCache<u8, u8> = OnceCache::new();
        cache.get_or_insert_with(1, || 1);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get(&1), None);
    }
}
