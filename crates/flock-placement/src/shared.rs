//! Copy-on-write ring shared between a writer and many readers.

use std::sync::{Arc, Mutex, RwLock};

use tracing::debug;

use crate::ring::HashRing;

/// A [`HashRing`] behind a copy-on-write snapshot.
///
/// Readers hold the read lock only long enough to clone the current `Arc`,
/// then look up against that snapshot lock-free. Writers are serialized by
/// a separate mutex: they clone and mutate the ring outside the `RwLock` and
/// take its write lock just to swap the pointer, so a reader never waits on
/// a rebuild and never sees a ring whose points are not yet sorted.
#[derive(Debug)]
pub struct SharedRing {
    current: RwLock<Arc<HashRing>>,
    /// Serializes writers so no addition is built on a stale ring.
    writer: Mutex<()>,
}

impl SharedRing {
    /// Wrap an existing ring.
    pub fn new(ring: HashRing) -> Self {
        Self {
            current: RwLock::new(Arc::new(ring)),
            writer: Mutex::new(()),
        }
    }

    /// Return the ring as of now. Later writes do not affect it.
    pub fn snapshot(&self) -> Arc<HashRing> {
        Arc::clone(&self.current.read().expect("ring lock poisoned"))
    }

    /// Find the node that owns `key` in the current ring.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.snapshot().lookup(key).map(str::to_owned)
    }

    /// Add nodes and publish the resulting ring.
    ///
    /// Concurrent writers are serialized, so none of their additions are
    /// lost. Readers keep using the previous ring until the swap.
    pub fn add_nodes<I, S>(&self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let _writer = self.writer.lock().expect("ring writer lock poisoned");
        let mut next = HashRing::clone(&self.snapshot());
        next.add_nodes(ids);
        debug!(points = next.point_count(), "published new ring");
        self.publish(next);
    }

    /// Replace the ring wholesale, e.g. after a membership change that
    /// removed nodes.
    pub fn replace(&self, ring: HashRing) {
        let _writer = self.writer.lock().expect("ring writer lock poisoned");
        debug!(points = ring.point_count(), "replaced ring");
        self.publish(ring);
    }

    fn publish(&self, ring: HashRing) {
        *self.current.write().expect("ring lock poisoned") = Arc::new(ring);
    }
}
