//! Operation counters for [`LfuCache`](crate::policy::lfu::LfuCache)
//! (feature `metrics`).
//!
//! ```
//! use lfukit::metrics::exporter::PrometheusTextExporter;
//! use lfukit::metrics::traits::MetricsExporter;
//! use lfukit::policy::lfu::LfuCache;
//!
//! let mut cache: LfuCache<&str, u32> = LfuCache::new(2);
//! cache.set("a", 1);
//! cache.get("a");
//! cache.get("missing");
//!
//! let snapshot = cache.metrics_snapshot();
//! assert_eq!(snapshot.get_hits, 1);
//! assert_eq!(snapshot.get_misses, 1);
//!
//! let exporter = PrometheusTextExporter::new("lfu", Vec::new());
//! exporter.export(&snapshot);
//! ```
pub mod cell;
pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;
