//! Response DTOs for the record cache API
//!
//! Defines the structure of outgoing HTTP response bodies other than
//! records themselves.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Lookups that returned a record
    pub hits: u64,
    /// Lookups that found nothing
    pub misses: u64,
    /// Records written
    pub writes: u64,
    /// Delete requests served
    pub deletes: u64,
    /// Backend failures, timeouts and integrity errors
    pub errors: u64,
    /// Entries dropped by the memory backend's capacity bound
    pub evictions: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(stats: CacheStats, evictions: u64) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            writes: stats.writes,
            deletes: stats.deletes,
            errors: stats.errors,
            evictions,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: String,
    /// "ok" or "unavailable"
    pub backend: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self::with_status("healthy", "ok")
    }

    /// Service is up but its backing store is not reachable.
    pub fn degraded() -> Self {
        Self::with_status("degraded", "unavailable")
    }

    fn with_status(status: &str, backend: &str) -> Self {
        Self {
            status: status.to_string(),
            backend: backend.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
