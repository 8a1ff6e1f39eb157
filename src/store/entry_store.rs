//! Entry storage for the LFU engine.
//!
//! Entries live in an [`IntrusiveList`] in creation order; a key index maps
//! each key to its entry handle. Removal unlinks the entry in O(1) and the
//! survivors keep their relative order, which is the order `iter()` yields.
//!
//! ```text
//!   index: FxHashMap<K, SlotId>        entries: IntrusiveList<Entry<K, V>>
//!   ┌─────────┬─────────┐              head ─► [foo_1] ◄──► [foo_3] ◄──► [foo_4] ◄── tail
//!   │  foo_1  │  id_0   │               oldest                              newest
//!   │  foo_3  │  id_2   │
//!   │  foo_4  │  id_3   │              Entry { key, value, last_access, bucket }
//!   └─────────┴─────────┘                                                  │
//!                                               handle into FrequencyLadder ┘
//! ```
use std::borrow::Borrow;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::intrusive_list::IntrusiveList;
use crate::ds::slot_arena::SlotId;

/// A cached key/value pair plus its LFU bookkeeping.
#[derive(Debug)]
pub struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    /// Clock reading (ms) of the insert or the last promoting read.
    pub(crate) last_access: u64,
    /// Non-owning handle of the ladder bucket holding `key`.
    pub(crate) bucket: SlotId,
}

impl<K, V> Entry<K, V> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn last_access(&self) -> u64 {
        self.last_access
    }

    pub fn bucket(&self) -> SlotId {
        self.bucket
    }
}

#[derive(Debug)]
pub struct EntryStore<K, V> {
    entries: IntrusiveList<Entry<K, V>>,
    index: FxHashMap<K, SlotId>,
}

impl<K, V> EntryStore<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            entries: IntrusiveList::new(),
            index: FxHashMap::default(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IntrusiveList::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of key index mappings; equals `len()` whenever the store is consistent.
    pub fn index_len(&self) -> usize {
        self.index.len()
    }

    /// Appends a new entry at the tail and indexes it.
    ///
    /// The caller guarantees `key` is not already stored.
    pub fn insert(&mut self, key: K, value: V, bucket: SlotId, now: u64) -> SlotId {
        debug_assert!(!self.index.contains_key(&key), "duplicate key inserted");
        let id = self.entries.push_back(Entry {
            key: key.clone(),
            value,
            last_access: now,
            bucket,
        });
        self.index.insert(key, id);
        id
    }

    pub fn lookup<Q>(&self, key: &Q) -> Option<SlotId>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).copied()
    }

    pub fn get(&self, id: SlotId) -> Option<&Entry<K, V>> {
        self.entries.get(id)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut Entry<K, V>> {
        self.entries.get_mut(id)
    }

    /// Unlinks the entry and drops its index mapping.
    pub fn remove(&mut self, id: SlotId) -> Option<Entry<K, V>> {
        let entry = self.entries.remove(id)?;
        self.index.remove(&entry.key);
        Some(entry)
    }

    /// Entries in storage order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry<K, V>> {
        self.entries.iter()
    }

    /// `(handle, entry)` pairs in storage order.
    pub fn handles(&self) -> impl Iterator<Item = (SlotId, &Entry<K, V>)> {
        self.entries.iter_entries()
    }

    /// `(key, value)` pairs in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|entry| (&entry.key, &entry.value))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.entries.debug_validate_invariants();
        assert_eq!(self.entries.len(), self.index.len());
        for (key, &id) in &self.index {
            let entry = self.entries.get(id).expect("index points at dead entry");
            assert!(&entry.key == key);
        }
    }
}

impl<K, V> Default for EntryStore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(store: &EntryStore<String, i32>) -> Vec<&str> {
        store.iter().map(|(k, _)| k.as_str()).collect()
    }

    #[test]
    fn insert_lookup_remove() {
        let mut store = EntryStore::new();
        let bucket = SlotId(0);
        let a = store.insert("a".to_string(), 1, bucket, 10);
        let b = store.insert("b".to_string(), 2, bucket, 11);

        assert_eq!(store.lookup("a"), Some(a));
        assert_eq!(store.lookup("b"), Some(b));
        assert_eq!(store.lookup("c"), None);
        assert_eq!(store.get(a).map(Entry::last_access), Some(10));

        let removed = store.remove(a).unwrap();
        assert_eq!(removed.key(), "a");
        assert_eq!(*removed.value(), 1);
        assert_eq!(store.lookup("a"), None);
        assert!(store.remove(a).is_none());
        assert_eq!(store.len(), 1);
        store.debug_validate_invariants();
    }

    #[test]
    fn iteration_is_creation_order_among_survivors() {
        let mut store = EntryStore::new();
        let bucket = SlotId(0);
        let ids: Vec<_> = ["a", "b", "c", "d"]
            .iter()
            .enumerate()
            .map(|(i, k)| store.insert(k.to_string(), i as i32, bucket, 0))
            .collect();

        store.remove(ids[1]);
        assert_eq!(keys(&store), vec!["a", "c", "d"]);

        // Re-inserted keys land at the tail.
        store.insert("b".to_string(), 9, bucket, 0);
        assert_eq!(keys(&store), vec!["a", "c", "d", "b"]);
        store.debug_validate_invariants();
    }

    #[test]
    fn get_mut_updates_in_place() {
        let mut store = EntryStore::with_capacity(4);
        let id = store.insert("k".to_string(), 1, SlotId(3), 5);
        if let Some(entry) = store.get_mut(id) {
            entry.value = 42;
            entry.last_access = 99;
        }
        let entry = store.get(id).unwrap();
        assert_eq!(entry.value, 42);
        assert_eq!(entry.last_access(), 99);
        assert_eq!(entry.bucket(), SlotId(3));
    }

    #[test]
    fn clear_empties_index_and_list() {
        let mut store = EntryStore::new();
        store.insert("a".to_string(), 1, SlotId(0), 0);
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.index_len(), 0);
        assert_eq!(store.iter().count(), 0);
    }
}
