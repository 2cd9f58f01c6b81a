//! Cache Entry Module
//!
//! Defines the structure for individual entries held by the memory backend.

use std::time::Duration;

// == Cache Entry ==
/// A serialized record with its absolute expiration time.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The serialized payload
    pub value: String,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry expiring `ttl` after `now_ms`.
    ///
    /// # Arguments
    /// * `value` - The serialized payload
    /// * `ttl` - Time-to-live, measured from `now_ms`
    /// * `now_ms` - Write time (Unix milliseconds)
    pub fn new(value: String, ttl: Duration, now_ms: u64) -> Self {
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);

        Self {
            value,
            created_at: now_ms,
            expires_at: now_ms.saturating_add(ttl_ms),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now_ms`.
    ///
    /// An entry is expired once the current time reaches its expiration
    /// time, so a fully elapsed TTL never yields a hit.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at
    }
}
