//! Thread-safe LFU cache (feature `concurrency`).
//!
//! [`ConcurrentLfuCache`] puts a whole [`LfuCache`] behind one
//! `parking_lot::Mutex`. Every operation that reads through the cache
//! (`get`) promotes, so there is no read-only fast path worth a `RwLock`.
//! Values are stored as `Arc<V>` and handed out as clones of that `Arc`, so
//! no borrow ever escapes the lock.
//!
//! Handles are cheap to clone and share the same cache.
//!
//! ```
//! use std::thread;
//! use lfukit::policy::concurrent::ConcurrentLfuCache;
//!
//! let cache: ConcurrentLfuCache<u32, String> = ConcurrentLfuCache::new(100);
//! let handles: Vec<_> = (0..4)
//!     .map(|t| {
//!         let cache = cache.clone();
//!         thread::spawn(move || {
//!             for i in 0..10 {
//!                 cache.set(t * 10 + i, format!("v{i}"));
//!             }
//!         })
//!     })
//!     .collect();
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! assert_eq!(cache.len(), 40);
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::builder::LfuConfig;
use crate::clock::{Clock, SystemClock};
use crate::error::InvariantError;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::LfuMetricsSnapshot;
use crate::policy::lfu::LfuCache;
use crate::traits::ReadOnlyCache;

/// Mutex-guarded [`LfuCache`] sharing values as `Arc<V>`.
pub struct ConcurrentLfuCache<K, V, C = SystemClock>
where
    K: Eq + Hash + Clone,
{
    inner: Arc<Mutex<LfuCache<K, Arc<V>, C>>>,
}

impl<K, V, C> Clone for ConcurrentLfuCache<K, V, C>
where
    K: Eq + Hash + Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V, C> fmt::Debug for ConcurrentLfuCache<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.inner.lock();
        f.debug_struct("ConcurrentLfuCache")
            .field("len", &cache.len())
            .field("capacity", &cache.capacity())
            .finish_non_exhaustive()
    }
}

impl<K, V> Default for ConcurrentLfuCache<K, V, SystemClock>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::with_config(LfuConfig::default())
    }
}

impl<K, V> ConcurrentLfuCache<K, V, SystemClock>
where
    K: Eq + Hash + Clone,
{
    /// Same corrective defaults as [`LfuCache::new`].
    pub fn new(max_entries: usize) -> Self {
        Self::from_cache(LfuCache::new(max_entries))
    }

    pub fn with_config(config: LfuConfig) -> Self {
        Self::from_cache(LfuCache::with_config(config))
    }
}

impl<K, V, C> ConcurrentLfuCache<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    pub fn with_config_and_clock(config: LfuConfig, clock: C) -> Self {
        Self::from_cache(LfuCache::with_config_and_clock(config, clock))
    }

    /// Wraps an existing single-threaded cache.
    pub fn from_cache(cache: LfuCache<K, Arc<V>, C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    /// See [`LfuCache::set`].
    pub fn set(&self, key: K, value: V) -> Option<Arc<V>> {
        self.set_with(key, value, false)
    }

    /// See [`LfuCache::set_with`].
    pub fn set_with(&self, key: K, value: V, overwrite: bool) -> Option<Arc<V>> {
        let value = Arc::new(value);
        let mut cache = self.inner.lock();
        cache.set_with(key, value, overwrite).map(Arc::clone)
    }

    /// Promoting read; see [`LfuCache::get`].
    pub fn get<Q>(&self, key: &Q) -> Option<Arc<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut cache = self.inner.lock();
        cache.get(key).map(Arc::clone)
    }

    pub fn peek<Q>(&self, key: &Q) -> Option<Arc<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let cache = self.inner.lock();
        cache.peek(key).map(Arc::clone)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().contains(key)
    }

    pub fn frequency<Q>(&self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().frequency(key)
    }

    pub fn delete<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().delete(key)
    }

    pub fn evict(&self, count: usize) -> usize {
        self.inner.lock().evict(count)
    }

    pub fn size(&self) -> usize {
        self.inner.lock().size()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    pub fn config(&self) -> LfuConfig {
        *self.inner.lock().config()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Visits entries in storage order while holding the lock.
    ///
    /// The callback must not call back into this cache.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&K, &V, usize),
    {
        let cache = self.inner.lock();
        cache.for_each(|key, value, index| visit(key, value, index));
    }

    /// Collects `f(key, value, index)` under the lock.
    pub fn map<U, F>(&self, mut f: F) -> Vec<U>
    where
        F: FnMut(&K, &V, usize) -> U,
    {
        let cache = self.inner.lock();
        cache.map(|key, value, index| f(key, value, index))
    }

    /// Runs `f` with exclusive access to the underlying cache.
    pub fn with_inner<R>(&self, f: impl FnOnce(&mut LfuCache<K, Arc<V>, C>) -> R) -> R {
        let mut cache = self.inner.lock();
        f(&mut cache)
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError>
    where
        K: fmt::Debug,
    {
        self.inner.lock().check_invariants()
    }

    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> LfuMetricsSnapshot {
        self.inner.lock().metrics_snapshot()
    }
}

impl<K, V, C> ReadOnlyCache<K> for ConcurrentLfuCache<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    fn len(&self) -> usize {
        self.inner.lock().len()
    }

    fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::LfuCacheBuilder;
    use crate::clock::ManualClock;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn send_sync_bounds() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ConcurrentLfuCache<String, Vec<u8>>>();
        assert_send_sync::<ConcurrentLfuCache<u64, u64, ManualClock>>();
    }

    #[test]
    fn mirrors_single_threaded_semantics() {
        let cache = ConcurrentLfuCache::new(3);
        cache.set("foo_1", "bar_1");
        cache.set("foo_2", "bar_2");
        cache.set("foo_3", "bar_3");
        cache.get("foo_1");
        assert_eq!(cache.set_with("foo_1", "bar_1_2", true).as_deref(), Some(&"bar_1_2"));
        cache.set("foo_4", "bar_4");
        cache.set("foo_5", "bar_5");

        assert_eq!(cache.map(|key, _, _| *key), vec!["foo_1", "foo_4", "foo_5"]);
        assert_eq!(cache.frequency("foo_1"), Some(2));
        assert!(cache.check_invariants().is_ok());
    }

    #[test]
    fn clones_share_state() {
        let cache: ConcurrentLfuCache<u32, u32> = ConcurrentLfuCache::new(10);
        let other = cache.clone();
        other.set(1, 10);
        assert_eq!(cache.peek(&1).as_deref(), Some(&10));
        assert!(cache.delete(&1));
        assert!(other.is_empty());
    }

    #[test]
    fn returned_arc_outlives_eviction() {
        let cache: ConcurrentLfuCache<u32, String> = ConcurrentLfuCache::new(1);
        let held = cache.set(1, "one".to_string()).unwrap();
        cache.set(2, "two".to_string());
        assert!(!cache.contains(&1));
        assert_eq!(*held, "one");
    }

    #[test]
    fn expiry_through_wrapper() {
        let clock = ManualClock::new();
        let config = LfuCacheBuilder::new().max_entries(4).max_age_ms(50).config();
        let cache: ConcurrentLfuCache<u32, u32, ManualClock> =
            ConcurrentLfuCache::with_config_and_clock(config, clock.clone());
        cache.set(1, 1);
        clock.advance(Duration::from_millis(51));
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.size(), 0);
    }

    #[test]
    fn parallel_writers_respect_capacity() {
        let cache: ConcurrentLfuCache<u64, u64> = ConcurrentLfuCache::new(64);
        let workers: Vec<_> = (0..8u64)
            .map(|t| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for i in 0..500u64 {
                        let key = (t * 1_000 + i) % 200;
                        cache.set(key, i);
                        cache.get(&(i % 50));
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }
        assert!(cache.len() <= 64);
        assert!(cache.check_invariants().is_ok());
    }

    #[test]
    fn for_each_and_with_inner() {
        let cache: ConcurrentLfuCache<u32, u32> = ConcurrentLfuCache::new(8);
        for i in 0..4 {
            cache.set(i, i * 10);
        }
        let mut sum = 0;
        cache.for_each(|_, value, _| sum += *value);
        assert_eq!(sum, 60);

        let evicted = cache.with_inner(|inner| inner.evict(2));
        assert_eq!(evicted, 2);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.config().max_entries(), 8);
    }
}
