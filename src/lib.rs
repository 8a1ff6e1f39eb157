//! lfukit: an O(1) least-frequently-used cache with optional lazy expiry.
//!
//! The cache keeps a ladder of frequency buckets in ascending count order.
//! Every key sits in exactly one bucket; a read moves it one rung up, and
//! eviction takes keys from the lowest rung, oldest arrival first. All
//! bookkeeping lives in slot arenas addressed by [`SlotId`] handles, so no
//! operation walks the ladder or the entries.
//!
//! ```
//! use lfukit::prelude::*;
//!
//! let mut cache = LfuCacheBuilder::new().max_entries(2).build::<&str, u32>();
//! cache.set("a", 1);
//! cache.set("b", 2);
//! cache.get("a");
//! cache.set("c", 3); // evicts "b", the only key never read
//!
//! assert!(cache.contains("a"));
//! assert!(!cache.contains("b"));
//! ```
//!
//! Features:
//!
//! - `metrics`: operation counters, snapshots, and a Prometheus text exporter.
//! - `concurrency`: [`ConcurrentLfuCache`](policy::concurrent::ConcurrentLfuCache),
//!   a `parking_lot` mutex around the engine.

pub mod builder;
pub mod clock;
pub mod ds;
pub mod error;
pub mod policy;
pub mod store;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
pub mod traits;

pub use crate::ds::{SlotArena, SlotId};
pub use crate::policy::lfu::LfuCache;
