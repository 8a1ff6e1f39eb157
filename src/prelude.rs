pub use crate::builder::{LfuCacheBuilder, LfuConfig};
pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "concurrency")]
pub use crate::policy::concurrent::ConcurrentLfuCache;
pub use crate::policy::lfu::LfuCache;
pub use crate::traits::ReadOnlyCache;
