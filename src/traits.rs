//! Shared read-only cache surface.
//!
//! Both the single-threaded [`LfuCache`](crate::policy::lfu::LfuCache) and the
//! mutex-guarded `ConcurrentLfuCache` (feature `concurrency`) implement
//! [`ReadOnlyCache`], so inspection helpers can be written once.
//!
//! None of these methods touch access frequency or entry age.
//!
//! ```
//! use lfukit::policy::lfu::LfuCache;
//! use lfukit::traits::ReadOnlyCache;
//!
//! fn fill_ratio<K, C: ReadOnlyCache<K>>(cache: &C) -> f64 {
//!     cache.len() as f64 / cache.capacity() as f64
//! }
//!
//! let mut cache: LfuCache<&str, i32> = LfuCache::new(4);
//! cache.set("a", 1);
//! assert_eq!(fill_ratio(&cache), 0.25);
//! ```

pub trait ReadOnlyCache<K> {
    /// Returns `true` if `key` is resident (expired-but-unread entries count).
    fn contains(&self, key: &K) -> bool;

    /// Number of resident entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries kept after any operation returns.
    fn capacity(&self) -> usize;
}
