//! Backing Store Trait
//!
//! The physical key-value storage a [`RecordStore`](super::RecordStore)
//! writes serialized records into.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

/// A key-value store with per-entry expiration.
///
/// Implementations see fully namespaced keys and opaque string payloads.
/// Every method touches at most one key and must be atomic for that key.
/// Connectivity problems are reported as
/// [`CacheError::BackendUnavailable`](crate::error::CacheError::BackendUnavailable);
/// an absent, expired or evicted key is `Ok(None)`.
#[async_trait]
pub trait CacheBackend: Send + Sync + 'static {
    /// Reads the live payload stored under `key`.
    async fn fetch(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any existing entry, expiring `ttl` from now.
    async fn store(&self, key: &str, value: String, ttl: Duration) -> Result<()>;

    /// Removes `key`. Absent keys are not an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Checks that the backend is reachable.
    async fn ping(&self) -> Result<()>;

    /// Entries this process dropped to respect a capacity bound.
    ///
    /// Backends that evict on their own (Redis) report zero.
    async fn evictions(&self) -> u64 {
        0
    }
}
