//! Cache configuration and builder.
//!
//! Configuration is corrective by default: missing or zero options fall back
//! to their defaults, so [`LfuCacheBuilder::build`] never fails. The strict
//! [`LfuCacheBuilder::try_build`] reports explicit zero values instead.
//!
//! | Option             | Default                                              |
//! |--------------------|------------------------------------------------------|
//! | `max_entries`      | 100                                                  |
//! | `evict_batch_size` | `max(1, round(0.1 × max_entries))` if `max_entries` was given, else 10 |
//! | `max_age`          | none (entries never expire)                          |
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//! use lfukit::builder::LfuCacheBuilder;
//!
//! let mut cache = LfuCacheBuilder::new()
//!     .max_entries(3)
//!     .max_age(Duration::from_secs(60))
//!     .build::<String, u32>();
//!
//! assert_eq!(cache.config().evict_batch_size(), 1);
//! cache.set("a".to_string(), 1);
//! assert_eq!(cache.get("a"), Some(&1));
//! ```

use std::hash::Hash;
use std::time::Duration;

use tracing::debug;

use crate::clock::{Clock, SystemClock, duration_to_millis};
use crate::error::ConfigError;
use crate::policy::lfu::LfuCache;

/// Capacity used when `max_entries` is missing or zero.
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// Batch size used when neither option is given.
pub const DEFAULT_EVICT_BATCH_SIZE: usize = 10;

/// `max(1, round(max_entries / 10))`, rounding halves up.
pub fn derived_evict_batch_size(max_entries: usize) -> usize {
    (max_entries.saturating_add(5) / 10).max(1)
}

/// Resolved, immutable cache configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LfuConfig {
    max_entries: usize,
    evict_batch_size: usize,
    max_age: Option<Duration>,
}

impl LfuConfig {
    /// Resolves raw options, replacing missing or zero values with defaults.
    ///
    /// `max_age_ms` is the age limit in milliseconds.
    pub fn from_options(
        max_entries: Option<usize>,
        evict_batch_size: Option<usize>,
        max_age_ms: Option<u64>,
    ) -> Self {
        LfuCacheBuilder {
            max_entries,
            evict_batch_size,
            max_age: max_age_ms.map(Duration::from_millis),
        }
        .config()
    }

    /// Capacity; `set` evicts as soon as the entry count exceeds it.
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Entries removed per capacity overflow.
    pub fn evict_batch_size(&self) -> usize {
        self.evict_batch_size
    }

    pub fn max_age(&self) -> Option<Duration> {
        self.max_age
    }

    /// Age limit in whole milliseconds, rounded up so sub-millisecond limits
    /// still expire.
    pub fn max_age_millis(&self) -> Option<u64> {
        self.max_age.map(|age| duration_to_millis(age).max(1))
    }
}

impl Default for LfuConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            evict_batch_size: DEFAULT_EVICT_BATCH_SIZE,
            max_age: None,
        }
    }
}

/// Builder for [`LfuCache`].
#[derive(Debug, Clone, Default)]
pub struct LfuCacheBuilder {
    max_entries: Option<usize>,
    evict_batch_size: Option<usize>,
    max_age: Option<Duration>,
}

impl LfuCacheBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries);
        self
    }

    pub fn evict_batch_size(mut self, evict_batch_size: usize) -> Self {
        self.evict_batch_size = Some(evict_batch_size);
        self
    }

    pub fn max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    pub fn max_age_ms(self, millis: u64) -> Self {
        self.max_age(Duration::from_millis(millis))
    }

    /// Resolves the options leniently.
    pub fn config(&self) -> LfuConfig {
        let explicit_max = self.max_entries.filter(|&n| n > 0);
        if self.max_entries == Some(0) {
            debug!(default = DEFAULT_MAX_ENTRIES, "max_entries = 0, using default");
        }

        let evict_batch_size = match self.evict_batch_size.filter(|&n| n > 0) {
            Some(n) => n,
            None => {
                if self.evict_batch_size == Some(0) {
                    debug!("evict_batch_size = 0, using default");
                }
                explicit_max.map_or(DEFAULT_EVICT_BATCH_SIZE, derived_evict_batch_size)
            },
        };

        let max_age = self.max_age.filter(|age| !age.is_zero());
        if self.max_age.is_some() && max_age.is_none() {
            debug!("max_age = 0, expiry disabled");
        }

        LfuConfig {
            max_entries: explicit_max.unwrap_or(DEFAULT_MAX_ENTRIES),
            evict_batch_size,
            max_age,
        }
    }

    /// Resolves the options, rejecting explicit zero values.
    pub fn try_config(&self) -> Result<LfuConfig, ConfigError> {
        if self.max_entries == Some(0) {
            return Err(ConfigError::new("max_entries", "must be > 0"));
        }
        if self.evict_batch_size == Some(0) {
            return Err(ConfigError::new("evict_batch_size", "must be > 0"));
        }
        if self.max_age.is_some_and(|age| age.is_zero()) {
            return Err(ConfigError::new("max_age", "must be non-zero"));
        }
        Ok(self.config())
    }

    pub fn build<K, V>(&self) -> LfuCache<K, V>
    where
        K: Eq + Hash + Clone,
    {
        LfuCache::with_config(self.config())
    }

    pub fn build_with_clock<K, V, C>(&self, clock: C) -> LfuCache<K, V, C>
    where
        K: Eq + Hash + Clone,
        C: Clock,
    {
        LfuCache::with_config_and_clock(self.config(), clock)
    }

    pub fn try_build<K, V>(&self) -> Result<LfuCache<K, V, SystemClock>, ConfigError>
    where
        K: Eq + Hash + Clone,
    {
        Ok(LfuCache::with_config(self.try_config()?))
    }
}
