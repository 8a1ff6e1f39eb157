//! Frequency ladder for O(1) LFU tracking.
//!
//! The ladder is an [`IntrusiveList`] of frequency buckets. Each bucket holds
//! an access count and the insertion-ordered set of keys currently at that
//! count. Buckets are kept strictly ascending by count, so the head bucket is
//! always the eviction frontier.
//!
//! ## Architecture
//!
//! ```text
//!   buckets: IntrusiveList<FrequencyBucket<K>>
//!
//!   head                                                      tail
//!    │                                                          │
//!    ▼                                                          ▼
//!   ┌──────────────┐     ┌──────────────┐     ┌──────────────────┐
//!   │ count: 1     │ ◄─► │ count: 2     │ ◄─► │ count: 7         │
//!   │ keys: [b, c] │     │ keys: [a]    │     │ keys: [d]        │
//!   └──────────────┘     └──────────────┘     └──────────────────┘
//!        ▲
//!        └── eviction_candidate() = b (oldest member of the head bucket)
//! ```
//!
//! ## Promote Flow
//!
//! ```text
//!   promote(bucket@2, "a"):
//!     1. next = 2 + 1
//!     2. bucket after @2 has count 3?  yes → add "a" to it
//!                                      no  → insert {3, [a]} right after @2
//!     3. remove "a" from @2; drop @2 if it is now empty
//!     4. return handle of the bucket holding "a"
//! ```
//!
//! Bucket handles are stable until the bucket empties and is unlinked; the
//! engine stores them in its entries as non-owning back-references.
//!
//! `debug_validate_invariants()` is available in debug/test builds.
use std::hash::Hash;

use crate::ds::intrusive_list::IntrusiveList;
use crate::ds::key_set::KeySet;
use crate::ds::slot_arena::SlotId;

/// Keys sharing one access count.
#[derive(Debug)]
pub struct FrequencyBucket<K> {
    count: u64,
    keys: KeySet<K>,
}

impl<K> FrequencyBucket<K>
where
    K: Eq + Hash + Clone,
{
    fn with_key(count: u64, key: K) -> Self {
        Self {
            count,
            keys: KeySet::with_key(key),
        }
    }

    /// Access count shared by every key in this bucket.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Number of keys at this count.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys at this count, oldest member first.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.keys.iter()
    }
}

/// Ascending ladder of frequency buckets.
#[derive(Debug)]
pub struct FrequencyLadder<K> {
    buckets: IntrusiveList<FrequencyBucket<K>>,
}

impl<K> FrequencyLadder<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            buckets: IntrusiveList::new(),
        }
    }

    /// Number of buckets (distinct counts) on the ladder.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Access count of the bucket behind `bucket`.
    pub fn count(&self, bucket: SlotId) -> Option<u64> {
        self.buckets.get(bucket).map(FrequencyBucket::count)
    }

    /// Returns `true` if `key` is a member of `bucket`.
    pub fn bucket_contains(&self, bucket: SlotId, key: &K) -> bool {
        self.buckets
            .get(bucket)
            .is_some_and(|b| b.keys.contains(key))
    }

    /// Places a newly inserted `key` at count 1.
    ///
    /// Joins the head bucket when it already has count 1, otherwise prepends
    /// a fresh count-1 bucket. Returns the handle of the head bucket.
    pub fn create_initial(&mut self, key: K) -> SlotId {
        if let Some(head) = self.buckets.front_id()
            && let Some(bucket) = self.buckets.get_mut(head)
            && bucket.count == 1
        {
            bucket.keys.insert(key);
            return head;
        }
        self.buckets.push_front(FrequencyBucket::with_key(1, key))
    }

    /// Moves `key` from `bucket` to the bucket one count higher.
    ///
    /// Returns the handle of the bucket now holding `key`, or `None` if
    /// `bucket` is not live or does not hold `key`. A key already at
    /// `u64::MAX` stays where it is.
    pub fn promote(&mut self, bucket: SlotId, key: &K) -> Option<SlotId> {
        let current = self.buckets.get(bucket)?;
        if !current.keys.contains(key) {
            return None;
        }
        let Some(next_count) = current.count.checked_add(1) else {
            return Some(bucket);
        };

        let target = match self.buckets.next_id(bucket) {
            Some(next_id)
                if self.buckets.get(next_id).map(FrequencyBucket::count) == Some(next_count) =>
            {
                if let Some(next_bucket) = self.buckets.get_mut(next_id) {
                    next_bucket.keys.insert(key.clone());
                }
                next_id
            },
            _ => self
                .buckets
                .insert_after(bucket, FrequencyBucket::with_key(next_count, key.clone()))?,
        };

        self.remove_key(bucket, key);
        Some(target)
    }

    /// Removes `key` from `bucket`, unlinking the bucket once it is empty.
    ///
    /// Returns `true` if `key` was a member.
    pub fn remove_key(&mut self, bucket: SlotId, key: &K) -> bool {
        let Some(current) = self.buckets.get_mut(bucket) else {
            return false;
        };
        if !current.keys.remove(key) {
            return false;
        }
        if current.keys.is_empty() {
            self.buckets.remove(bucket);
        }
        true
    }

    /// Earliest-inserted key of the lowest-count bucket.
    pub fn eviction_candidate(&self) -> Option<&K> {
        self.buckets.front().and_then(|bucket| bucket.keys.first())
    }

    /// Count of the lowest bucket, if any.
    pub fn min_count(&self) -> Option<u64> {
        self.buckets.front().map(FrequencyBucket::count)
    }

    /// Buckets from lowest to highest count.
    pub fn iter(&self) -> impl Iterator<Item = &FrequencyBucket<K>> {
        self.buckets.iter()
    }

    /// Total number of keys across all buckets.
    pub fn key_count(&self) -> usize {
        self.buckets.iter().map(FrequencyBucket::len).sum()
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.buckets.debug_validate_invariants();
        let mut last = 0u64;
        for bucket in self.buckets.iter() {
            assert!(bucket.count > last, "bucket counts must strictly increase");
            assert!(!bucket.keys.is_empty(), "empty bucket left on the ladder");
            bucket.keys.debug_validate_invariants();
            last = bucket.count;
        }
    }
}

impl<K> Default for FrequencyLadder<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
