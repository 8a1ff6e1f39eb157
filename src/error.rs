//! Error types for lfukit.
//!
//! Ordinary cache operations never fail: a miss is `None` / `false`. The two
//! error types here cover the opt-in strict paths.
//!
//! - [`ConfigError`]: returned by [`LfuCacheBuilder::try_build`] when an
//!   option was explicitly set to a value the lenient path would replace.
//! - [`InvariantError`]: returned by [`LfuCache::check_invariants`] when the
//!   ladder, store, and key index disagree.
//!
//! [`LfuCacheBuilder::try_build`]: crate::builder::LfuCacheBuilder::try_build
//! [`LfuCache::check_invariants`]: crate::policy::lfu::LfuCache::check_invariants
//!
//! ```
//! use lfukit::builder::LfuCacheBuilder;
//!
//! let err = LfuCacheBuilder::new()
//!     .max_entries(0)
//!     .try_build::<String, u32>()
//!     .unwrap_err();
//! assert_eq!(err.option(), "max_entries");
//!
//! // The lenient path falls back to the default instead.
//! let cache = LfuCacheBuilder::new().max_entries(0).build::<String, u32>();
//! assert_eq!(cache.capacity(), 100);
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// An explicitly supplied configuration option was out of range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    option: &'static str,
    message: String,
}

impl ConfigError {
    /// Creates a `ConfigError` for `option` with a description.
    #[inline]
    pub fn new(option: &'static str, msg: impl Into<String>) -> Self {
        Self {
            option,
            message: msg.into(),
        }
    }

    /// Name of the rejected option (`max_entries`, `evict_batch_size`, `max_age`).
    #[inline]
    pub fn option(&self) -> &'static str {
        self.option
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {}", self.option, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Internal cache invariants are violated.
///
/// Carries a human-readable description of the first invariant that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}
