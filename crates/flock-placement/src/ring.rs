//! Consistent hashing ring implementation.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::error::RingError;
use crate::hash::{HashFn, crc32_ieee};

/// A key whose owner differs between two ring states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    /// The key that changed hands.
    pub key: String,
    /// The node that owned it before, `None` if the old ring was empty.
    pub from: Option<String>,
    /// The node that owns it now, `None` if the new ring is empty.
    pub to: Option<String>,
}

/// Consistent hashing ring mapping keys to node identifiers.
///
/// Each node is placed at `replicas` points on a `u32` ring. Lookups walk
/// clockwise from the key's hash to the next point.
///
/// The ring does no internal locking: mutation takes `&mut self`. Wrap it in
/// a [`SharedRing`](crate::SharedRing) to share it between threads.
#[derive(Debug, Clone)]
pub struct HashRing {
    hash: HashFn,
    /// Virtual points per node.
    replicas: usize,
    /// Ring positions, sorted ascending, no duplicates.
    points: Vec<u32>,
    /// Ring position -> node id.
    owners: HashMap<u32, String>,
}

impl HashRing {
    /// Create an empty ring using the CRC32 (IEEE) hash.
    pub fn new(replicas: usize) -> Result<Self, RingError> {
        Self::with_hasher(replicas, crc32_ieee)
    }

    /// Create an empty ring with a custom hash function.
    ///
    /// All processes that must agree on key ownership need the same node
    /// list, replica count, and hash function.
    pub fn with_hasher(replicas: usize, hash: HashFn) -> Result<Self, RingError> {
        if replicas == 0 {
            return Err(RingError::ZeroReplicas);
        }
        Ok(Self {
            hash,
            replicas,
            points: Vec::new(),
            owners: HashMap::new(),
        })
    }

    /// Whether no node has been added yet.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Add nodes to the ring.
    ///
    /// Node `id` gets the points `hash("{i}{id}")` for `i` in `0..replicas`.
    /// When two points collide, the node added last owns the position.
    ///
    /// Adding an id that is already on the ring is a caller error: it is not
    /// detected, and the extra points it produces are redundant.
    pub fn add_nodes<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for id in ids {
            let id = id.as_ref();
            for i in 0..self.replicas {
                let point = (self.hash)(format!("{i}{id}").as_bytes());
                self.points.push(point);
                self.owners.insert(point, id.to_owned());
            }
            debug!(node = id, replicas = self.replicas, "added node to ring");
        }

        self.points.sort_unstable();
        self.points.dedup();
    }

    /// Find the node that owns `key`, or `None` if the ring is empty.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        if self.is_empty() {
            return None;
        }

        let hash = (self.hash)(key.as_bytes());
        // First point >= hash, wrapping past the top of the ring.
        let mut idx = self.points.partition_point(|&p| p < hash);
        if idx == self.points.len() {
            idx = 0;
        }

        self.owners.get(&self.points[idx]).map(String::as_str)
    }

    /// Number of virtual points each node gets.
    pub fn replicas(&self) -> usize {
        self.replicas
    }

    /// Total number of distinct points on the ring.
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Distinct node ids that own at least one point, sorted.
    pub fn node_ids(&self) -> Vec<String> {
        let ids: BTreeSet<&String> = self.owners.values().collect();
        ids.into_iter().cloned().collect()
    }

    /// List the keys whose owner differs between `old` and `new`.
    ///
    /// An owner can use this after a membership change to find cached keys
    /// that now belong to someone else.
    pub fn diff<S: AsRef<str>>(old: &HashRing, new: &HashRing, keys: &[S]) -> Vec<Migration> {
        keys.iter()
            .filter_map(|key| {
                let key = key.as_ref();
                let from = old.lookup(key);
                let to = new.lookup(key);
                (from != to).then(|| Migration {
                    key: key.to_owned(),
                    from: from.map(str::to_owned),
                    to: to.map(str::to_owned),
                })
            })
            .collect()
    }
}
