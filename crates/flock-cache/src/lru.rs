//! Bounded least-recently-used cache.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use tracing::trace;

use crate::list::{Iter, RecencyList, SlotId};

/// Hook invoked with every entry that leaves the cache.
pub type EvictionCallback<K, V> = Box<dyn FnMut(&K, &V) + Send>;

/// Fixed-capacity key/value store that evicts the least recently used entry.
///
/// A hash map points at nodes of an arena-backed recency list, so `add`,
/// `get`, `remove`, and `remove_oldest` are O(1).
///
/// Not synchronized: every method takes `&mut self` or `&self`. Use
/// [`SharedCache`](crate::SharedCache) to share one between threads.
///
/// The eviction callback runs synchronously for capacity evictions,
/// [`remove`](Self::remove), [`remove_oldest`](Self::remove_oldest), and
/// [`clear`](Self::clear). It is not called when a value is overwritten by
/// [`add`](Self::add) or when the cache is dropped.
pub struct BoundedCache<K, V> {
    /// Maximum number of entries, 0 = unbounded.
    max_entries: usize,
    index: HashMap<K, SlotId>,
    list: RecencyList<K, V>,
    on_evicted: Option<EvictionCallback<K, V>>,
}

impl<K, V> BoundedCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a cache holding at most `max_entries` entries.
    ///
    /// A `max_entries` of 0 means no limit.
    pub fn new(max_entries: usize) -> Self {
        Self {
            max_entries,
            index: HashMap::new(),
            list: RecencyList::new(),
            on_evicted: None,
        }
    }

    /// Create a cache with an eviction callback already installed.
    pub fn with_eviction<F>(max_entries: usize, on_evicted: F) -> Self
    where
        F: FnMut(&K, &V) + Send + 'static,
    {
        let mut cache = Self::new(max_entries);
        cache.set_on_evicted(on_evicted);
        cache
    }

    /// Install (or replace) the eviction callback.
    ///
    /// The callback must not touch this cache.
    pub fn set_on_evicted<F>(&mut self, on_evicted: F)
    where
        F: FnMut(&K, &V) + Send + 'static,
    {
        self.on_evicted = Some(Box::new(on_evicted));
    }

    /// Remove the eviction callback.
    pub fn clear_on_evicted(&mut self) {
        self.on_evicted = None;
    }

    /// Insert or update an entry and mark it most recently used.
    ///
    /// Inserting a new key into a full cache evicts the least recently used
    /// entry.
    pub fn add(&mut self, key: K, value: V) {
        if let Some(&id) = self.index.get(&key) {
            *self.list.value_mut(id) = value;
            self.list.move_to_front(id);
            return;
        }

        let id = self.list.push_front(key.clone(), value);
        self.index.insert(key, id);

        if self.max_entries != 0 && self.list.len() > self.max_entries {
            self.remove_oldest();
            trace!(
                max_entries = self.max_entries,
                "evicted least recently used entry"
            );
        }
    }

    /// Look up a value and mark it most recently used.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = *self.index.get(key)?;
        self.list.move_to_front(id);
        Some(self.list.value(id))
    }

    /// Look up a value without changing its recency.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).map(|&id| self.list.value(id))
    }

    /// Whether `key` is cached. Does not change recency.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Remove an entry, passing it to the eviction callback.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = self.index.remove(key)?;
        let (key, value) = self.list.remove(id);
        self.notify(&key, &value);
        Some(value)
    }

    /// Evict the least recently used entry, passing it to the eviction
    /// callback. Returns `None` when the cache is empty.
    pub fn remove_oldest(&mut self) -> Option<(K, V)> {
        let id = self.list.back()?;
        self.index.remove(self.list.key(id));
        let (key, value) = self.list.remove(id);
        self.notify(&key, &value);
        Some((key, value))
    }

    /// Remove every entry, calling the eviction callback once for each.
    pub fn clear(&mut self) {
        let entries = self.list.drain();
        self.index.clear();
        if let Some(on_evicted) = self.on_evicted.as_mut() {
            for (key, value) in &entries {
                on_evicted(key, value);
            }
        }
    }

    /// Current number of entries.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.list.len() == 0
    }

    /// Configured capacity, 0 = unbounded.
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Iterate entries from most to least recently used.
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.list.iter()
    }

    fn notify(&mut self, key: &K, value: &V) {
        if let Some(on_evicted) = self.on_evicted.as_mut() {
            on_evicted(key, value);
        }
    }
}

impl<K, V> fmt::Debug for BoundedCache<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedCache")
            .field("max_entries", &self.max_entries)
            .field("len", &self.list.len())
            .field("has_on_evicted", &self.on_evicted.is_some())
            .finish_non_exhaustive()
    }
}
