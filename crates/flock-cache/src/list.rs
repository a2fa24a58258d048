//! Recency list stored in an index-addressed arena.
//!
//! Nodes live in a `Vec` slot array and link to each other by slot index,
//! so moving a node to the front or unlinking it is O(1) without raw
//! pointers. Freed slots are recycled through a free list.

/// Stable handle to a node in a [`RecencyList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct SlotId(usize);

#[derive(Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Doubly linked list of key/value pairs, front = most recently used.
#[derive(Debug)]
pub(crate) struct RecencyList<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<K, V> RecencyList<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Insert at the front and return the new node's handle.
    pub(crate) fn push_front(&mut self, key: K, value: V) -> SlotId {
        let node = Node {
            key,
            value,
            prev: None,
            next: self.head,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };

        match self.head {
            Some(old) => self.node_mut(old).prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
        self.len += 1;
        SlotId(idx)
    }

    /// Handle of the least recently used node.
    pub(crate) fn back(&self) -> Option<SlotId> {
        self.tail.map(SlotId)
    }

    pub(crate) fn key(&self, id: SlotId) -> &K {
        &self.node(id.0).key
    }

    pub(crate) fn value(&self, id: SlotId) -> &V {
        &self.node(id.0).value
    }

    pub(crate) fn value_mut(&mut self, id: SlotId) -> &mut V {
        &mut self.node_mut(id.0).value
    }

    pub(crate) fn move_to_front(&mut self, id: SlotId) {
        if self.head == Some(id.0) {
            return;
        }
        self.unlink(id.0);

        let head = self.head;
        let node = self.node_mut(id.0);
        node.prev = None;
        node.next = head;
        if let Some(old) = head {
            self.node_mut(old).prev = Some(id.0);
        }
        self.head = Some(id.0);
    }

    /// Unlink a node and hand back its key and value.
    pub(crate) fn remove(&mut self, id: SlotId) -> (K, V) {
        self.unlink(id.0);
        let node = self.slots[id.0]
            .take()
            .expect("recency list slot is vacant");
        self.free.push(id.0);
        self.len -= 1;
        (node.key, node.value)
    }

    /// Remove every node, front to back.
    pub(crate) fn drain(&mut self) -> Vec<(K, V)> {
        let mut out = Vec::with_capacity(self.len);
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            let node = self.slots[idx]
                .take()
                .expect("recency list slot is vacant");
            cursor = node.next;
            out.push((node.key, node.value));
        }
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
        out
    }

    /// Iterate front (most recent) to back (least recent).
    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = {
            let node = self.node(idx);
            (node.prev, node.next)
        };
        match prev {
            Some(p) => self.node_mut(p).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.node_mut(n).prev = prev,
            None => self.tail = prev,
        }
    }

    fn node(&self, idx: usize) -> &Node<K, V> {
        self.slots[idx]
            .as_ref()
            .expect("recency list slot is vacant")
    }

    fn node_mut(&mut self, idx: usize) -> &mut Node<K, V> {
        self.slots[idx]
            .as_mut()
            .expect("recency list slot is vacant")
    }
}

/// Iterator over list entries, most recently used first.
pub struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let node = self.list.node(idx);
        self.cursor = node.next;
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
