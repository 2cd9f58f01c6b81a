//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Which backing store the service puts records in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// In-process map, swept by the background cleanup task
    Memory,
    /// Redis, expiry handled natively
    Redis,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(BackendKind::Memory),
            "redis" => Ok(BackendKind::Redis),
            other => Err(format!("unknown cache backend '{}'", other)),
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Backing store selection
    pub backend: BackendKind,
    /// Redis connection string, used when `backend` is `Redis`
    pub redis_url: String,
    /// Namespace prepended to every key sent to the backing store
    pub key_prefix: String,
    /// TTL in seconds for records written without an explicit TTL
    pub default_ttl: u64,
    /// Maximum number of entries the memory backend holds
    pub max_entries: usize,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Upper bound on a single backing-store call, in milliseconds
    pub operation_timeout_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_BACKEND` - `memory` or `redis` (default: memory)
    /// - `REDIS_CONNECTIONSTRING` - Redis URL (default: redis://127.0.0.1:6379)
    /// - `CACHE_KEY_PREFIX` - Backend key namespace (default: EcommerceCache:)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 1800)
    /// - `MAX_ENTRIES` - Memory backend capacity (default: 1000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 1)
    /// - `OPERATION_TIMEOUT_MS` - Backend call timeout (default: 2000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_env::<u16>("SERVER_PORT").unwrap_or(defaults.server_port),
            backend: parse_env::<BackendKind>("CACHE_BACKEND").unwrap_or(defaults.backend),
            redis_url: env::var("REDIS_CONNECTIONSTRING").unwrap_or(defaults.redis_url),
            key_prefix: env::var("CACHE_KEY_PREFIX").unwrap_or(defaults.key_prefix),
            default_ttl: parse_env::<u64>("DEFAULT_TTL")
                .filter(|ttl| *ttl > 0)
                .unwrap_or(defaults.default_ttl),
            max_entries: parse_env::<usize>("MAX_ENTRIES")
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_entries),
            cleanup_interval: parse_env::<u64>("CLEANUP_INTERVAL")
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.cleanup_interval),
            operation_timeout_ms: parse_env::<u64>("OPERATION_TIMEOUT_MS")
                .filter(|ms| *ms > 0)
                .unwrap_or(defaults.operation_timeout_ms),
        }
    }

    /// Default TTL as a Duration.
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }

    /// Operation timeout as a Duration.
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            backend: BackendKind::Memory,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            key_prefix: "EcommerceCache:".to_string(),
            default_ttl: 30 * 60,
            max_entries: 1000,
            cleanup_interval: 1,
            operation_timeout_ms: 2000,
        }
    }
}

fn parse_env<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}
