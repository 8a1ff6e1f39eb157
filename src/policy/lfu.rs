//! # LFU (Least Frequently Used) Cache
//!
//! Key/value cache that evicts the least frequently read entries once it holds
//! more than `max_entries`, with an optional maximum age checked lazily on
//! read. Lookup, insertion, promotion, and eviction are all O(1).
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────────┐
//!   │                         LfuCache<K, V, C>                                │
//!   │                                                                          │
//!   │   ┌────────────────────────────────────────────────────────────────────┐ │
//!   │   │  FrequencyLadder<K>   (ascending buckets, head = eviction frontier)│ │
//!   │   │                                                                    │ │
//!   │   │   [1: foo_3, foo_4] ◄──► [2: foo_1] ◄──► [5: foo_9]                 │ │
//!   │   │        ▲                     ▲                                     │ │
//!   │   └────────┼─────────────────────┼─────────────────────────────────────┘ │
//!   │            │ bucket handle       │ bucket handle                         │
//!   │   ┌────────┼─────────────────────┼─────────────────────────────────────┐ │
//!   │   │  EntryStore<K, V>  (creation order + key index)                    │ │
//!   │   │                                                                    │ │
//!   │   │   foo_1 { value, last_access, bucket ─► [2] }                      │ │
//!   │   │   foo_3 { value, last_access, bucket ─► [1] }                      │ │
//!   │   │   ...                                                              │ │
//!   │   └────────────────────────────────────────────────────────────────────┘ │
//!   │                                                                          │
//!   │   config: LfuConfig { max_entries, evict_batch_size, max_age }           │
//!   │   clock:  C: Clock                                                       │
//!   └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Lifecycle
//!
//! ```text
//!   absent ──set──► present@1 ──get──► present@2 ──get──► ... present@n
//!      ▲                │                   │                    │
//!      └────────────────┴───── delete / eviction / expired read ─┘
//! ```
//!
//! `set` on a present key never changes its frequency: without `overwrite`
//! it is a no-op returning the stored value, with `overwrite` it swaps the
//! value in place (bucket and age untouched).
//!
//! ## Eviction
//!
//! Capacity is enforced synchronously inside `set`: once the entry count
//! exceeds `max_entries`, `evict_batch_size` keys are removed from the lowest
//! bucket, earliest-inserted-into-that-bucket first. A new key can therefore
//! be evicted by its own overflow when every other key has been read.
//!
//! ## Expiry
//!
//! With `max_age` set, `get` drops an entry whose last promoting read (or
//! insert) is more than `max_age` ago. There is no background sweep: expired
//! entries stay resident, count toward capacity, and may be chosen by
//! eviction until something reads them. `peek` never expires.
//!
//! ## Operations
//!
//! | Method              | Complexity | Notes                                  |
//! |---------------------|------------|----------------------------------------|
//! | `set` / `set_with`  | O(1)*      | *plus O(batch) when it overflows       |
//! | `get`               | O(1)       | Promotes, refreshes age, may expire    |
//! | `peek`              | O(1)       | No promotion, no expiry                |
//! | `delete`            | O(1)       |                                        |
//! | `evict(n)`          | O(n)       | Manual trimming                        |
//! | `for_each` / `map`  | O(len)     | Creation order among survivors         |
//! | `clear`             | O(len)     | Drops all three structures             |
//!
//! ## Thread Safety
//!
//! `LfuCache` is not thread-safe. Wrap the whole engine behind one lock
//! (see `ConcurrentLfuCache` with the `concurrency` feature); promotion and
//! eviction span several internal structures.
//!
//! ## Example Usage
//!
//! ```
//! use lfukit::policy::lfu::LfuCache;
//!
//! let mut cache = LfuCache::new(3);
//! cache.set("foo_1", "bar_1");
//! cache.set("foo_2", "bar_2");
//! cache.set("foo_3", "bar_3");
//!
//! cache.get("foo_1");                         // foo_1 → frequency 2
//! cache.set_with("foo_1", "bar_1_2", true);   // value replaced, still 2
//!
//! cache.set("foo_4", "bar_4");                // evicts foo_2
//! cache.set("foo_5", "bar_5");                // evicts foo_3
//!
//! let keys = cache.map(|key, _, _| *key);
//! assert_eq!(keys, vec!["foo_1", "foo_4", "foo_5"]);
//! assert_eq!(cache.frequency("foo_1"), Some(2));
//! ```

use std::borrow::Borrow;
use std::fmt::Debug;
use std::hash::Hash;

use tracing::{debug, trace};

use crate::builder::{LfuCacheBuilder, LfuConfig};
use crate::clock::{Clock, SystemClock};
use crate::ds::frequency_ladder::FrequencyLadder;
use crate::ds::slot_arena::SlotId;
use crate::error::InvariantError;
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::LfuMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::LfuMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{
    CoreMetricsRecorder, LfuMetricsReadRecorder, LfuMetricsRecorder, MetricsSnapshotProvider,
};
use crate::store::entry_store::{Entry, EntryStore};
use crate::traits::ReadOnlyCache;

/// LFU cache with optional lazy max-age expiry.
///
/// See the module-level documentation for details.
#[derive(Debug)]
pub struct LfuCache<K, V, C = SystemClock>
where
    K: Eq + Hash + Clone,
{
    ladder: FrequencyLadder<K>,
    store: EntryStore<K, V>,
    config: LfuConfig,
    clock: C,
    #[cfg(feature = "metrics")]
    metrics: LfuMetrics,
}

/// Owned copy of the cache's internal layout, for tests and debugging only.
///
/// Not part of the stable API; field shapes may change between releases.
#[doc(hidden)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LfuDebugState<K> {
    /// `(count, keys oldest first)` for every bucket, lowest count first.
    pub ladder: Vec<(u64, Vec<K>)>,
    /// Entries in storage order.
    pub entries: Vec<LfuDebugEntry<K>>,
    pub index_len: usize,
    pub size: usize,
}

#[doc(hidden)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LfuDebugEntry<K> {
    pub key: K,
    pub frequency: u64,
    pub last_access: u64,
}

impl<K, V> LfuCache<K, V, SystemClock>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache holding at most `max_entries` entries (0 → default).
    ///
    /// The eviction batch is derived from `max_entries`; there is no expiry.
    pub fn new(max_entries: usize) -> Self {
        Self::with_config(LfuCacheBuilder::new().max_entries(max_entries).config())
    }

    pub fn with_config(config: LfuConfig) -> Self {
        Self::with_config_and_clock(config, SystemClock::new())
    }
}

impl<K, V, C> LfuCache<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    pub fn with_config_and_clock(config: LfuConfig, clock: C) -> Self {
        Self {
            ladder: FrequencyLadder::new(),
            store: EntryStore::with_capacity(config.max_entries().min(4096)),
            config,
            clock,
            #[cfg(feature = "metrics")]
            metrics: LfuMetrics::default(),
        }
    }

    pub fn config(&self) -> &LfuConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Number of resident entries, expired-but-unread ones included.
    pub fn size(&self) -> usize {
        self.store.len()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Same as `config().max_entries()`.
    pub fn capacity(&self) -> usize {
        self.config.max_entries()
    }

    /// Inserts `key` if absent; an existing value is kept.
    ///
    /// Equivalent to `set_with(key, value, false)`.
    pub fn set(&mut self, key: K, value: V) -> Option<&V> {
        self.set_with(key, value, false)
    }

    /// Stores `value` under `key` and returns the value now stored.
    ///
    /// For a present key, `overwrite` replaces the value in place (frequency
    /// and age are untouched); otherwise the supplied value is dropped and the
    /// existing one is returned. A new key starts at frequency 1 and may
    /// trigger a batch eviction; `None` is returned only if that eviction
    /// removed the new key itself.
    pub fn set_with(&mut self, key: K, value: V, overwrite: bool) -> Option<&V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        if let Some(id) = self.store.lookup(&key) {
            let entry = self.store.get_mut(id)?;
            if overwrite {
                #[cfg(feature = "metrics")]
                self.metrics.record_insert_update();
                entry.value = value;
            } else {
                #[cfg(feature = "metrics")]
                self.metrics.record_insert_ignored();
            }
            return Some(&entry.value);
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();

        let now = self.clock.now_millis();
        let bucket = self.ladder.create_initial(key.clone());
        let id = self.store.insert(key, value, bucket, now);

        if self.store.len() > self.config.max_entries() {
            trace!(
                size = self.store.len(),
                max_entries = self.config.max_entries(),
                "capacity exceeded"
            );
            self.evict(self.config.evict_batch_size());
        }

        // The slot is only recycled by a later insert, so a miss here means
        // the new entry was part of the eviction batch.
        self.store.get(id).map(Entry::value)
    }

    /// Returns the value for `key`, counting the read.
    ///
    /// Promotes the key one frequency level and refreshes its age. If the
    /// entry is older than `max_age` it is deleted and `None` is returned.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(id) = self.store.lookup(key) else {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_miss();
            return None;
        };

        let now = self.clock.now_millis();
        if let Some(age) = self.expired_age(id, now) {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_expired();
            self.remove_entry(id);
            trace!(age_ms = age, size = self.store.len(), "entry expired on read");
            return None;
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();

        let entry = self.store.get_mut(id)?;
        if let Some(bucket) = self.ladder.promote(entry.bucket, &entry.key) {
            entry.bucket = bucket;
        }
        entry.last_access = now;
        Some(&entry.value)
    }

    /// Returns the value for `key` without promotion, age refresh, or expiry.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        #[cfg(feature = "metrics")]
        (&self.metrics).record_peek_call();

        let value = self
            .store
            .lookup(key)
            .and_then(|id| self.store.get(id))
            .map(Entry::value);

        #[cfg(feature = "metrics")]
        if value.is_some() {
            (&self.metrics).record_peek_hit();
        }

        value
    }

    /// Returns `true` if `key` is resident; does not check expiry.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.lookup(key).is_some()
    }

    /// Current access count of `key` (1 after insert, +1 per `get`).
    pub fn frequency<Q>(&self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        #[cfg(feature = "metrics")]
        (&self.metrics).record_frequency_call();

        let id = self.store.lookup(key)?;
        let entry = self.store.get(id)?;
        self.ladder.count(entry.bucket)
    }

    /// Removes `key`; returns `false` if it was not present.
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        #[cfg(feature = "metrics")]
        self.metrics.record_delete_call();

        let removed = self
            .store
            .lookup(key)
            .and_then(|id| self.remove_entry(id))
            .is_some();

        #[cfg(feature = "metrics")]
        if removed {
            self.metrics.record_delete_found();
        }

        removed
    }

    /// Removes up to `count` entries from the lowest frequency bucket upward.
    ///
    /// Returns how many entries were removed; fewer than `count` only when the
    /// cache ran empty.
    pub fn evict(&mut self, count: usize) -> usize {
        #[cfg(feature = "metrics")]
        self.metrics.record_evict_call();

        let mut evicted = 0;
        while evicted < count {
            let Some(id) = self
                .ladder
                .eviction_candidate()
                .and_then(|key| self.store.lookup(key))
            else {
                break;
            };
            if self.remove_entry(id).is_none() {
                break;
            }
            #[cfg(feature = "metrics")]
            self.metrics.record_evicted_entry();
            evicted += 1;
        }

        if evicted > 0 {
            debug!(
                requested = count,
                evicted,
                size = self.store.len(),
                "evicted least frequently used entries"
            );
        }
        evicted
    }

    /// Visits every entry in storage order as `(key, value, index)`.
    ///
    /// Storage order is creation order among the entries still present.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&K, &V, usize),
    {
        for (index, (key, value)) in self.store.iter().enumerate() {
            visit(key, value, index);
        }
    }

    /// Collects `f(key, value, index)` for every entry in storage order.
    pub fn map<U, F>(&self, mut f: F) -> Vec<U>
    where
        F: FnMut(&K, &V, usize) -> U,
    {
        let mut out = Vec::with_capacity(self.len());
        self.for_each(|key, value, index| out.push(f(key, value, index)));
        out
    }

    /// `(key, value)` pairs in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.store.iter()
    }

    /// Drops every entry and starts over with empty structures.
    pub fn clear(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();

        let dropped = self.store.len();
        self.ladder = FrequencyLadder::new();
        self.store = EntryStore::new();
        debug!(dropped, "cleared lfu cache");
    }

    /// Returns an owned snapshot of the ladder and store layout.
    #[doc(hidden)]
    pub fn debug_state(&self) -> LfuDebugState<K> {
        LfuDebugState {
            ladder: self
                .ladder
                .iter()
                .map(|bucket| (bucket.count(), bucket.keys().cloned().collect()))
                .collect(),
            entries: self
                .store
                .entries()
                .map(|entry| LfuDebugEntry {
                    key: entry.key.clone(),
                    frequency: self.ladder.count(entry.bucket).unwrap_or(0),
                    last_access: entry.last_access,
                })
                .collect(),
            index_len: self.store.index_len(),
            size: self.len(),
        }
    }

    /// Checks that the ladder, entry store, and key index agree.
    pub fn check_invariants(&self) -> Result<(), InvariantError>
    where
        K: Debug,
    {
        let size = self.store.len();
        if self.store.index_len() != size {
            return Err(InvariantError::new(format!(
                "entry store holds {} entries but key index has {}",
                size,
                self.store.index_len()
            )));
        }
        if size > self.config.max_entries() {
            return Err(InvariantError::new(format!(
                "size {} exceeds max_entries {}",
                size,
                self.config.max_entries()
            )));
        }

        let mut last_count = 0u64;
        for bucket in self.ladder.iter() {
            if bucket.is_empty() {
                return Err(InvariantError::new(format!(
                    "empty bucket with count {} left on the ladder",
                    bucket.count()
                )));
            }
            if bucket.count() <= last_count {
                return Err(InvariantError::new(format!(
                    "bucket count {} does not exceed previous {}",
                    bucket.count(),
                    last_count
                )));
            }
            last_count = bucket.count();
        }

        let ladder_keys = self.ladder.key_count();
        if ladder_keys != size {
            return Err(InvariantError::new(format!(
                "ladder tracks {} keys but store holds {}",
                ladder_keys, size
            )));
        }

        for (id, entry) in self.store.handles() {
            if self.store.lookup(&entry.key) != Some(id) {
                return Err(InvariantError::new(format!(
                    "key index does not point at entry {:?}",
                    entry.key
                )));
            }
            if !self.ladder.bucket_contains(entry.bucket, &entry.key) {
                return Err(InvariantError::new(format!(
                    "entry {:?} is not a member of its bucket",
                    entry.key
                )));
            }
        }

        Ok(())
    }

    /// Age of the entry in ms if it exceeds `max_age`.
    fn expired_age(&self, id: SlotId, now: u64) -> Option<u64> {
        let max_age = self.config.max_age_millis()?;
        let age = now.saturating_sub(self.store.get(id)?.last_access);
        (age > max_age).then_some(age)
    }

    fn remove_entry(&mut self, id: SlotId) -> Option<Entry<K, V>> {
        let entry = self.store.remove(id)?;
        self.ladder.remove_key(entry.bucket, &entry.key);
        Some(entry)
    }

    #[cfg(test)]
    pub(crate) fn debug_validate_invariants(&self)
    where
        K: Debug,
    {
        self.ladder.debug_validate_invariants();
        self.store.debug_validate_invariants();
        if let Err(err) = self.check_invariants() {
            panic!("{err}");
        }
    }
}

impl<K, V> Default for LfuCache<K, V, SystemClock>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::with_config(LfuConfig::default())
    }
}

impl<K, V, C> ReadOnlyCache<K> for LfuCache<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    fn contains(&self, key: &K) -> bool {
        self.store.lookup(key).is_some()
    }

    fn len(&self) -> usize {
        self.store.len()
    }

    fn capacity(&self) -> usize {
        self.config.max_entries()
    }
}

#[cfg(feature = "metrics")]
impl<K, V, C> LfuCache<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    pub fn metrics_snapshot(&self) -> LfuMetricsSnapshot {
        LfuMetricsSnapshot {
            get_calls: self.metrics.get_calls,
            get_hits: self.metrics.get_hits,
            get_misses: self.metrics.get_misses,
            get_expired: self.metrics.get_expired,
            insert_calls: self.metrics.insert_calls,
            insert_new: self.metrics.insert_new,
            insert_updates: self.metrics.insert_updates,
            insert_ignored: self.metrics.insert_ignored,
            delete_calls: self.metrics.delete_calls,
            delete_found: self.metrics.delete_found,
            evict_calls: self.metrics.evict_calls,
            evicted_entries: self.metrics.evicted_entries,
            clear_calls: self.metrics.clear_calls,
            peek_calls: self.metrics.peek_calls.get(),
            peek_hits: self.metrics.peek_hits.get(),
            frequency_calls: self.metrics.frequency_calls.get(),
            cache_len: self.store.len(),
            capacity: self.config.max_entries(),
            bucket_count: self.ladder.len(),
        }
    }
}

#[cfg(feature = "metrics")]
impl<K, V, C> MetricsSnapshotProvider<LfuMetricsSnapshot> for LfuCache<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    fn snapshot(&self) -> LfuMetricsSnapshot {
        self.metrics_snapshot()
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    #[derive(Debug, Clone)]
    enum Op {
        Set(u8, u32),
        Overwrite(u8, u32),
        Get(u8),
        Peek(u8),
        Delete(u8),
        Evict(u8),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (0u8..16, any::<u32>()).prop_map(|(k, v)| Op::Set(k, v)),
            1 => (0u8..16, any::<u32>()).prop_map(|(k, v)| Op::Overwrite(k, v)),
            4 => (0u8..16).prop_map(Op::Get),
            1 => (0u8..16).prop_map(Op::Peek),
            1 => (0u8..16).prop_map(Op::Delete),
            1 => (0u8..4).prop_map(Op::Evict),
        ]
    }

    /// Reference model: (value, frequency, tick when the key joined its bucket).
    #[derive(Default)]
    struct Model {
        entries: HashMap<u8, (u32, u64, u64)>,
        tick: u64,
    }

    impl Model {
        fn next_tick(&mut self) -> u64 {
            self.tick += 1;
            self.tick
        }

        fn evict(&mut self, count: usize) {
            for _ in 0..count {
                let victim = self
                    .entries
                    .iter()
                    .min_by_key(|(_, (_, freq, joined))| (*freq, *joined))
                    .map(|(key, _)| *key);
                match victim {
                    Some(key) => {
                        self.entries.remove(&key);
                    },
                    None => break,
                }
            }
        }
    }

    proptest! {
        /// Property: the engine evicts exactly what a naive min-scan would.
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_matches_reference_model(
            max_entries in 1usize..8,
            batch in 1usize..4,
            ops in prop::collection::vec(op_strategy(), 0..200)
        ) {
            let mut cache = LfuCacheBuilder::new()
                .max_entries(max_entries)
                .evict_batch_size(batch)
                .build::<u8, u32>();
            let mut model = Model::default();

            for op in ops {
                match op {
                    Op::Set(k, v) | Op::Overwrite(k, v) => {
                        let overwrite = matches!(op, Op::Overwrite(..));
                        let stored = cache.set_with(k, v, overwrite).copied();
                        if let Some(entry) = model.entries.get_mut(&k) {
                            if overwrite {
                                entry.0 = v;
                            }
                            prop_assert_eq!(stored, Some(entry.0));
                        } else {
                            let tick = model.next_tick();
                            model.entries.insert(k, (v, 1, tick));
                            if model.entries.len() > max_entries {
                                model.evict(batch);
                            }
                            let expected = model.entries.get(&k).map(|e| e.0);
                            prop_assert_eq!(stored, expected);
                        }
                    },
                    Op::Get(k) => {
                        let got = cache.get(&k).copied();
                        let tick = model.next_tick();
                        let expected = model.entries.get_mut(&k).map(|entry| {
                            entry.1 += 1;
                            entry.2 = tick;
                            entry.0
                        });
                        prop_assert_eq!(got, expected);
                    },
                    Op::Peek(k) => {
                        prop_assert_eq!(cache.peek(&k).copied(), model.entries.get(&k).map(|e| e.0));
                    },
                    Op::Delete(k) => {
                        prop_assert_eq!(cache.delete(&k), model.entries.remove(&k).is_some());
                    },
                    Op::Evict(n) => {
                        let before = model.entries.len();
                        model.evict(n as usize);
                        prop_assert_eq!(cache.evict(n as usize), before - model.entries.len());
                    },
                }

                prop_assert!(cache.size() <= max_entries);
                prop_assert_eq!(cache.size(), model.entries.len());
                for (key, (value, freq, _)) in &model.entries {
                    prop_assert_eq!(cache.peek(key), Some(value));
                    prop_assert_eq!(cache.frequency(key), Some(*freq));
                }
                prop_assert!(cache.check_invariants().is_ok());
            }
        }

        /// Property: frequencies never decrease while a key stays resident
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_frequency_is_monotonic(
            reads in prop::collection::vec(0u8..6, 0..100)
        ) {
            let mut cache = LfuCache::new(6);
            for k in 0u8..6 {
                cache.set(k, k);
            }
            let mut last: Vec<u64> = vec![1; 6];
            for k in reads {
                cache.get(&k);
                for key in 0u8..6 {
                    let freq = cache.frequency(&key).unwrap();
                    prop_assert!(freq >= last[key as usize]);
                    last[key as usize] = freq;
                }
            }
            cache.debug_validate_invariants();
        }
    }
}
