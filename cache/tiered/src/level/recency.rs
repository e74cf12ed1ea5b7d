//! Least-recently-used level storage.
//!
//! Entries live in a `Vec<Node>` arena threaded by an index-linked doubly
//! linked list ordered by recency (head = LRU, tail = MRU). A hashmap maps
//! each key to its arena slot, so get, put and evict are all O(1). Freed
//! slots are recycled through a free list.

use crate::entry::CacheEntry;
use ahash::AHashMap;
use std::mem;

/// Null link.
const NIL: usize = usize::MAX;

struct Node {
    key: String,
    value: String,
    prev: usize,
    next: usize,
}

/// LRU-ordered storage for one level.
pub struct RecencyLevel {
    capacity: usize,
    index: AHashMap<String, usize>,
    nodes: Vec<Node>,
    free: Vec<usize>,
    /// Least recently used.
    head: usize,
    /// Most recently used.
    tail: usize,
}

impl RecencyLevel {
    /// Create an empty level holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            index: AHashMap::with_capacity(capacity),
            nodes: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: NIL,
            tail: NIL,
        }
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries stored.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns true if the level holds no entries.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns true if `key` is stored in this level.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Take the value for `key` out of the level.
    ///
    /// The lookup counts as an access, so the entry is moved to the MRU
    /// position before it is unlinked and handed to the caller.
    pub fn get(&mut self, key: &str) -> Option<String> {
        let idx = *self.index.get(key)?;
        self.touch(idx);
        Some(self.take(idx).value)
    }

    /// Insert `key` as the most recently used entry.
    ///
    /// A full level always gives up its LRU entry first, which is returned
    /// for the caller to cascade. An entry displaced by its own replacement
    /// is superseded and not returned.
    pub fn put(&mut self, key: String, value: String) -> Option<CacheEntry> {
        let displaced = if self.len() >= self.capacity {
            self.evict().filter(|evicted| evicted.key != key)
        } else {
            None
        };

        match self.index.get(&key) {
            Some(&idx) => {
                self.nodes[idx].value = value;
                self.touch(idx);
            }
            None => self.push_back(key, value),
        }

        displaced
    }

    /// Remove and return the least recently used entry.
    pub fn evict(&mut self) -> Option<CacheEntry> {
        if self.head == NIL {
            return None;
        }
        Some(self.take(self.head))
    }

    /// Remove `key` without touching recency, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let idx = *self.index.get(key)?;
        Some(self.take(idx).value)
    }

    /// Iterate over `(key, value)` pairs from LRU to MRU.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            nodes: &self.nodes,
            cursor: self.head,
        }
    }

    /// Iterate over stored keys in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    /// Move `idx` to the MRU position.
    fn touch(&mut self, idx: usize) {
        if idx == self.tail {
            return;
        }
        self.detach(idx);
        self.attach_tail(idx);
    }

    fn detach(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);

        if prev == NIL {
            self.head = next;
        } else {
            self.nodes[prev].next = next;
        }

        if next == NIL {
            self.tail = prev;
        } else {
            self.nodes[next].prev = prev;
        }

        self.nodes[idx].prev = NIL;
        self.nodes[idx].next = NIL;
    }

    fn attach_tail(&mut self, idx: usize) {
        self.nodes[idx].prev = self.tail;
        self.nodes[idx].next = NIL;

        if self.tail == NIL {
            self.head = idx;
        } else {
            self.nodes[self.tail].next = idx;
        }
        self.tail = idx;
    }

    fn push_back(&mut self, key: String, value: String) {
        let node = Node {
            key: key.clone(),
            value,
            prev: NIL,
            next: NIL,
        };

        let idx = match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = node;
                idx
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        };

        self.attach_tail(idx);
        self.index.insert(key, idx);
    }

    /// Unlink `idx` and move its contents out, recycling the slot.
    fn take(&mut self, idx: usize) -> CacheEntry {
        self.detach(idx);

        let node = &mut self.nodes[idx];
        let entry = CacheEntry::new(mem::take(&mut node.key), mem::take(&mut node.value));

        self.index.remove(&entry.key);
        self.free.push(idx);
        entry
    }
}

/// Iterator over a [`RecencyLevel`] from LRU to MRU.
pub struct Iter<'a> {
    nodes: &'a [Node],
    cursor: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == NIL {
            return None;
        }
        let node = &self.nodes[self.cursor];
        self.cursor = node.next;
        Some((node.key.as_str(), node.value.as_str()))
    }
}
