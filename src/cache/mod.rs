//! Cache Module
//!
//! Cache-aside record store and the backing stores it writes to.

mod backend;
mod clock;
mod entry;
mod lru;
mod memory;
mod redis_backend;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use backend::CacheBackend;
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use memory::MemoryBackend;
pub use redis_backend::RedisBackend;
pub use stats::{CacheStats, StatsCounters};
pub use store::{RecordStore, DEFAULT_OPERATION_TIMEOUT};

use std::time::Duration;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed serialized record size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

/// Longest TTL a record can be cached for (one year)
pub const MAX_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);
