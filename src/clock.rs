//! Millisecond clocks used for lazy max-age expiry.
//!
//! The engine only ever compares two readings of the same clock, so a clock
//! needs to be monotonic but not anchored to wall time.
//!
//! - [`SystemClock`]: monotonic milliseconds since the clock was created.
//! - [`ManualClock`]: shared, manually advanced clock for tests and for
//!   callers that drive time themselves (simulations, replay).
//!
//! ```
//! use std::time::Duration;
//! use lfukit::clock::{Clock, ManualClock};
//!
//! let clock = ManualClock::new();
//! let observer = clock.clone();
//! clock.advance(Duration::from_millis(250));
//! assert_eq!(observer.now_millis(), 250);
//! ```
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Source of millisecond timestamps for entry ages.
pub trait Clock {
    /// Current reading in milliseconds. Must never go backwards.
    fn now_millis(&self) -> u64;
}

/// Monotonic clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        duration_to_millis(self.origin.elapsed())
    }
}

/// Manually driven clock; clones share the same reading.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    /// Starts at 0 ms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves time forward by `by`.
    pub fn advance(&self, by: Duration) {
        let delta = duration_to_millis(by);
        let _ = self
            .now
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |now| {
                Some(now.saturating_add(delta))
            });
    }

    /// Jumps to `millis`; earlier readings than the current one are ignored.
    pub fn set_millis(&self, millis: u64) {
        self.now.fetch_max(millis, Ordering::AcqRel);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.load(Ordering::Acquire)
    }
}

pub(crate) fn duration_to_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances_and_is_shared() {
        let clock = ManualClock::new();
        let other = clock.clone();
        assert_eq!(clock.now_millis(), 0);
        clock.advance(Duration::from_millis(40));
        other.advance(Duration::from_secs(1));
        assert_eq!(clock.now_millis(), 1_040);
        assert_eq!(other.now_millis(), 1_040);
    }

    #[test]
    fn manual_clock_never_goes_backwards() {
        let clock = ManualClock::new();
        clock.set_millis(500);
        clock.set_millis(100);
        assert_eq!(clock.now_millis(), 500);
        clock.advance(Duration::MAX);
        assert_eq!(clock.now_millis(), u64::MAX);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_millis();
        let b = clock.now_millis();
        assert!(b >= a);
    }
}
