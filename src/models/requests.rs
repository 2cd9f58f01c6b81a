//! Request DTOs for the record cache API
//!
//! Record bodies are [`Record`](super::Record) itself; this module holds the
//! query parameters that ride alongside them.

use std::time::Duration;

use serde::Deserialize;

/// Query string for `POST /record`
///
/// # Fields
/// - `ttl`: Optional TTL in seconds (uses the configured default if absent)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PutQuery {
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl PutQuery {
    /// Resolves the TTL to apply, falling back to `default`.
    ///
    /// An explicit `ttl=0` is passed through so the store rejects it.
    pub fn ttl_or(&self, default: Duration) -> Duration {
        self.ttl.map(Duration::from_secs).unwrap_or(default)
    }
}
