//! Fixed-capacity key/value cache with least-recently-used eviction
//!
//! The cache is internally synchronized: all operations take a single
//! mutex, so a shared reference can be used from any number of threads or
//! tasks without external locking. Every operation is O(1).
//!
//! Recency is a total order over the entries, updated on every `get` and
//! `put`. When an insert would exceed the capacity, the entry touched
//! longest ago is evicted first.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Sentinel slot index marking the end of the recency list
const NIL: usize = usize::MAX;

struct Entry<K, V> {
    key: K,
    value: V,
    prev: usize,
    next: usize,
}

/// Recency list and key index. Entries live in a slab so list links are
/// plain indices; evicted slots are reused in place.
struct Inner<K, V> {
    entries: Vec<Entry<K, V>>,
    index: HashMap<K, usize>,
    /// Most recently used slot
    head: usize,
    /// Least recently used slot
    tail: usize,
}

impl<K, V> Inner<K, V> {
    fn detach(&mut self, slot: usize) {
        let (prev, next) = (self.entries[slot].prev, self.entries[slot].next);
        if prev != NIL {
            self.entries[prev].next = next;
        } else {
            self.head = next;
        }
        if next != NIL {
            self.entries[next].prev = prev;
        } else {
            self.tail = prev;
        }
    }

    fn push_front(&mut self, slot: usize) {
        self.entries[slot].prev = NIL;
        self.entries[slot].next = self.head;
        if self.head != NIL {
            self.entries[self.head].prev = slot;
        } else {
            self.tail = slot;
        }
        self.head = slot;
    }

    fn promote(&mut self, slot: usize) {
        if self.head != slot {
            self.detach(slot);
            self.push_front(slot);
        }
    }
}

/// Bounded cache with least-recently-used eviction
pub struct LruCache<K, V> {
    capacity: usize,
    inner: Mutex<Inner<K, V>>,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create a cache holding at most `capacity` entries. A capacity of
    /// zero is clamped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            inner: Mutex::new(Inner {
                entries: Vec::with_capacity(capacity),
                index: HashMap::with_capacity(capacity),
                head: NIL,
                tail: NIL,
            }),
        }
    }

    /// Maximum number of entries the cache can hold
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current number of entries
    pub fn len(&self) -> usize {
        self.lock().index.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a key, promoting it to most recently used on a hit.
    /// Absence is `None`, never a failure.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut inner = self.lock();
        let slot = *inner.index.get(key)?;
        inner.promote(slot);
        Some(inner.entries[slot].value.clone())
    }

    /// Insert or update a key, promoting it to most recently used. When the
    /// cache is full and the key is new, the least recently used entry is
    /// evicted first. Always returns `true`.
    pub fn put(&self, key: K, value: V) -> bool {
        let mut inner = self.lock();
        let inner = &mut *inner;

        if let Some(&slot) = inner.index.get(&key) {
            inner.entries[slot].value = value;
            inner.promote(slot);
            return true;
        }

        let slot = if inner.entries.len() == self.capacity {
            // Full: reuse the least recently used slot in place
            let slot = inner.tail;
            inner.detach(slot);
            inner.index.remove(&inner.entries[slot].key);
            inner.entries[slot].key = key.clone();
            inner.entries[slot].value = value;
            slot
        } else {
            inner.entries.push(Entry {
                key: key.clone(),
                value,
                prev: NIL,
                next: NIL,
            });
            inner.entries.len() - 1
        };

        inner.index.insert(key, slot);
        inner.push_front(slot);
        true
    }

    /// Keys ordered most-to-least recently used. Diagnostic accessor,
    /// mainly for tests.
    pub fn keys(&self) -> Vec<K> {
        let inner = self.lock();
        let mut keys = Vec::with_capacity(inner.index.len());
        let mut slot = inner.head;
        while slot != NIL {
            keys.push(inner.entries[slot].key.clone());
            slot = inner.entries[slot].next;
        }
        keys
    }

    fn lock(&self) -> MutexGuard<'_, Inner<K, V>> {
        // A panic while holding the lock leaves only a stale recency order,
        // which the next operation repairs; recover instead of poisoning.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
