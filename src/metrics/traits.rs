//! # Metrics Traits
//!
//! Recording, snapshotting, and export are separate concerns so the cache
//! only ever writes counters.
//!
//! ```text
//!                 ┌─────────────────────────────┐
//!                 │     CoreMetricsRecorder     │
//!                 │  get_hit/get_miss/insert    │
//!                 │  evict/clear                │
//!                 └──────────────┬──────────────┘
//!                                │
//!                                ▼
//!                 ┌─────────────────────────────┐      ┌─────────────────────────┐
//!                 │     LfuMetricsRecorder      │      │ LfuMetricsReadRecorder  │
//!                 │  expired/ignored/delete     │      │ peek/frequency (&self)  │
//!                 └─────────────────────────────┘      └─────────────────────────┘
//!
//!   Consumption (decoupled from recording):
//!   ┌──────────────────────────────┐    ┌──────────────────────────────┐
//!   │ MetricsSnapshotProvider<S>   │    │ MetricsExporter<S>           │
//!   │ (bench/test)                 │    │ (production monitoring)      │
//!   └──────────────────────────────┘    └──────────────────────────────┘
//! ```

/// Counters shared by any cache policy.
pub trait CoreMetricsRecorder {
    fn record_get_hit(&mut self);
    fn record_get_miss(&mut self);
    fn record_insert_call(&mut self);
    fn record_insert_new(&mut self);
    fn record_insert_update(&mut self);
    fn record_evict_call(&mut self);
    fn record_evicted_entry(&mut self);
    fn record_clear(&mut self);
}

/// LFU engine counters for `&mut self` paths.
pub trait LfuMetricsRecorder: CoreMetricsRecorder {
    /// A read found the key but its age exceeded `max_age`.
    fn record_get_expired(&mut self);
    /// `set` without overwrite hit an existing key.
    fn record_insert_ignored(&mut self);
    fn record_delete_call(&mut self);
    fn record_delete_found(&mut self);
}

/// LFU counters for `&self` paths (interior mutability).
pub trait LfuMetricsReadRecorder {
    fn record_peek_call(&self);
    fn record_peek_hit(&self);
    fn record_frequency_call(&self);
}

/// Produces a point-in-time copy of the counters.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Publishes a snapshot to a monitoring backend.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
