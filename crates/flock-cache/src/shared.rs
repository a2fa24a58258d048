//! Thread-safe wrapper around [`BoundedCache`].

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Mutex;

use crate::lru::BoundedCache;

/// A [`BoundedCache`] guarded by a single mutex.
///
/// All operations take the same lock. The critical sections are pure
/// in-memory work, so contention stays short. `get` returns a clone of the
/// value; wrap large values in `Arc` or `Bytes` to keep that cheap.
///
/// The eviction callback runs with the lock held and must not call back
/// into the same cache.
#[derive(Debug)]
pub struct SharedCache<K, V> {
    inner: Mutex<BoundedCache<K, V>>,
}

impl<K, V> SharedCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a cache holding at most `max_entries` entries, 0 = unbounded.
    pub fn new(max_entries: usize) -> Self {
        Self::from_cache(BoundedCache::new(max_entries))
    }

    /// Share an existing cache, keeping its entries and callback.
    pub fn from_cache(cache: BoundedCache<K, V>) -> Self {
        Self {
            inner: Mutex::new(cache),
        }
    }

    /// Install (or replace) the eviction callback.
    pub fn set_on_evicted<F>(&self, on_evicted: F)
    where
        F: FnMut(&K, &V) + Send + 'static,
    {
        self.inner
            .lock()
            .expect("cache lock poisoned")
            .set_on_evicted(on_evicted);
    }

    /// Insert or update an entry, evicting the oldest one if full.
    pub fn add(&self, key: K, value: V) {
        self.inner
            .lock()
            .expect("cache lock poisoned")
            .add(key, value);
    }

    /// Look up a value and promote it to most recently used.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.inner
            .lock()
            .expect("cache lock poisoned")
            .get(key)
            .cloned()
    }

    /// Whether `key` is cached. Does not change recency.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner
            .lock()
            .expect("cache lock poisoned")
            .contains(key)
    }

    /// Remove an entry, passing it to the eviction callback.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().expect("cache lock poisoned").remove(key)
    }

    /// Evict the least recently used entry.
    pub fn remove_oldest(&self) -> Option<(K, V)> {
        self.inner
            .lock()
            .expect("cache lock poisoned")
            .remove_oldest()
    }

    /// Remove every entry, calling the eviction callback for each.
    pub fn clear(&self) {
        self.inner.lock().expect("cache lock poisoned").clear();
    }

    /// Current number of cached entries.
    pub fn len(&self) -> usize {
        self.inner.lock().expect("cache lock poisoned").len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().expect("cache lock poisoned").is_empty()
    }
}
