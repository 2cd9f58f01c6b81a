//! Redis Backend Module
//!
//! Backing store on Redis. Expiration is delegated to Redis through
//! `PSETEX`, so no sweeper runs for this backend.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client as RedisClient, RedisResult};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::cache::CacheBackend;
use crate::error::{CacheError, Result};

/// Redis-backed store.
///
/// Connects lazily on first use and shares one multiplexed connection
/// across all operations and clones. A failed connect is reported as
/// unavailable and never retried here; a dropped connection is discarded
/// so the next operation reconnects.
#[derive(Clone)]
pub struct RedisBackend {
    client: RedisClient,
    shared: Arc<Mutex<Option<MultiplexedConnection>>>,
}

impl fmt::Debug for RedisBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisBackend")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

impl RedisBackend {
    /// Creates a backend for `url`. Does not connect yet.
    pub fn open(url: &str) -> Result<Self> {
        let client = RedisClient::open(url)
            .map_err(|e| CacheError::MalformedInput(format!("invalid redis url: {}", e)))?;
        Ok(Self {
            client,
            shared: Arc::new(Mutex::new(None)),
        })
    }

    async fn connection(&self) -> Result<MultiplexedConnection> {
        let mut slot = self.shared.lock().await;
        if let Some(conn) = slot.as_ref() {
            return Ok(conn.clone());
        }

        let conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| {
                warn!(error = %e, "Redis connection failed");
                CacheError::from(e)
            })?;
        debug!("Redis connection established");
        *slot = Some(conn.clone());
        Ok(conn)
    }

    /// Converts a command result, forgetting the shared connection when it broke.
    async fn settle<T>(&self, result: RedisResult<T>) -> Result<T> {
        match result {
            Ok(value) => Ok(value),
            Err(e) => {
                if e.is_io_error() || e.is_connection_dropped() {
                    *self.shared.lock().await = None;
                    warn!(error = %e, "Redis connection lost");
                }
                Err(CacheError::from(e))
            }
        }
    }
}

#[async_trait]
impl CacheBackend for RedisBackend {
    async fn fetch(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection().await?;
        let result: RedisResult<Option<String>> = conn.get(key).await;

        // A value that is not UTF-8 text was not written by this store
        if let Err(e) = &result {
            if e.kind() == redis::ErrorKind::TypeError {
                return Err(CacheError::Integrity {
                    key: key.to_string(),
                    reason: e.to_string(),
                });
            }
        }
        self.settle(result).await
    }

    async fn store(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        // PSETEX rejects 0; sub-millisecond TTLs round up
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1);
        let mut conn = self.connection().await?;
        let result: RedisResult<()> = conn.pset_ex(key, value, ttl_ms).await;
        self.settle(result).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut conn = self.connection().await?;
        let result: RedisResult<()> = conn.del(key).await;
        self.settle(result).await
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.connection().await?;
        let result: RedisResult<String> = redis::cmd("PING").query_async(&mut conn).await;
        self.settle(result).await.map(|_| ())
    }
}
