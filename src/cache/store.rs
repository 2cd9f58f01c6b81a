//! Record Store Module
//!
//! The cache-aside front: typed get/put/delete over a [`CacheBackend`], with
//! key namespacing, TTL validation, per-operation timeouts and traffic stats.
//!
//! The store never loads from the system of record on its own. Callers
//! either handle a miss themselves or opt into [`RecordStore::get_or_load`].

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, warn};

use crate::cache::{
    CacheBackend, CacheStats, StatsCounters, MAX_KEY_LENGTH, MAX_TTL, MAX_VALUE_SIZE,
};
use crate::error::{CacheError, Result};

/// Default upper bound on a single backing-store call.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(2);

// == Record Store ==
/// Cache-aside store for serializable records.
///
/// Cloning is cheap; clones share the backend and the stats counters.
#[derive(Clone)]
pub struct RecordStore {
    backend: Arc<dyn CacheBackend>,
    prefix: String,
    timeout: Duration,
    stats: Arc<StatsCounters>,
}

impl fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordStore")
            .field("prefix", &self.prefix)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl RecordStore {
    // == Constructor ==
    /// Creates a store over `backend` with no key prefix and the default timeout.
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self {
            backend,
            prefix: String::new(),
            timeout: DEFAULT_OPERATION_TIMEOUT,
            stats: Arc::new(StatsCounters::default()),
        }
    }

    /// Sets the namespace prepended to every key sent to the backend.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the upper bound on each backend call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    // == Get ==
    /// Looks up the record stored under `key`.
    ///
    /// Returns `Ok(None)` when the key is absent, expired or was evicted.
    /// A stored payload that no longer deserializes is an integrity error,
    /// not a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let backend_key = self.backend_key(key)?;
        let raw = self
            .bounded("get", key, self.backend.fetch(&backend_key))
            .await?;

        let Some(payload) = raw else {
            self.stats.record_miss();
            debug!(key, "Cache miss");
            return Ok(None);
        };

        match serde_json::from_str(&payload) {
            Ok(record) => {
                self.stats.record_hit();
                debug!(key, "Cache hit");
                Ok(Some(record))
            }
            Err(e) => {
                self.stats.record_error();
                error!(key, error = %e, "Stored payload failed to deserialize");
                Err(CacheError::Integrity {
                    key: key.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }

    // == Put ==
    /// Stores `record` under `key`, expiring `ttl` from now.
    ///
    /// Overwrites any existing entry unconditionally. Input is validated
    /// before the backend is touched.
    pub async fn put<T: Serialize + ?Sized>(
        &self,
        key: &str,
        record: &T,
        ttl: Duration,
    ) -> Result<()> {
        let backend_key = self.backend_key(key)?;
        validate_ttl(ttl)?;

        let payload = serde_json::to_string(record).map_err(|e| {
            CacheError::MalformedInput(format!("Record failed to serialize: {}", e))
        })?;
        if payload.len() > MAX_VALUE_SIZE {
            return Err(CacheError::MalformedInput(format!(
                "Record exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            )));
        }

        self.bounded("put", key, self.backend.store(&backend_key, payload, ttl))
            .await?;
        self.stats.record_write();
        debug!(key, ttl_ms = ttl.as_millis() as u64, "Record cached");
        Ok(())
    }

    // == Delete ==
    /// Removes the record under `key`. Deleting an absent key succeeds.
    pub async fn delete(&self, key: &str) -> Result<()> {
        let backend_key = self.backend_key(key)?;
        self.bounded("delete", key, self.backend.remove(&backend_key))
            .await?;
        self.stats.record_delete();
        debug!(key, "Record removed");
        Ok(())
    }

    // == Get Or Load ==
    /// Explicit read-through: returns the cached record, or on a miss awaits
    /// `load` and caches what it returns.
    ///
    /// `load` runs with no store lock held. Cache failures are returned as
    /// they are and never turn into a call to `load`; a failing `load`
    /// surfaces as [`CacheError::Source`].
    pub async fn get_or_load<T, F, Fut>(&self, key: &str, ttl: Duration, load: F) -> Result<Option<T>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<Option<T>>>,
    {
        validate_ttl(ttl)?;

        if let Some(record) = self.get(key).await? {
            return Ok(Some(record));
        }

        let loaded = load().await?;
        if let Some(record) = &loaded {
            self.put(key, record, ttl).await?;
        }
        Ok(loaded)
    }

    // == Ping ==
    /// Checks that the backend answers within the operation timeout.
    pub async fn ping(&self) -> Result<()> {
        self.bounded("ping", "", self.backend.ping()).await
    }

    // == Stats ==
    /// Returns a snapshot of store traffic.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    /// Entries the backend dropped to respect its capacity bound.
    pub async fn evictions(&self) -> u64 {
        self.backend.evictions().await
    }

    fn backend_key(&self, key: &str) -> Result<String> {
        if key.is_empty() {
            return Err(CacheError::MalformedInput("Key cannot be empty".to_string()));
        }
        if key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::MalformedInput(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }
        Ok(format!("{}{}", self.prefix, key))
    }

    async fn bounded<T>(
        &self,
        op: &'static str,
        key: &str,
        call: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        let result = match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout(self.timeout)),
        };

        if let Err(e) = &result {
            self.stats.record_error();
            warn!(op, key, error = %e, "Backing store operation failed");
        }
        result
    }
}

fn validate_ttl(ttl: Duration) -> Result<()> {
    if ttl.is_zero() {
        return Err(CacheError::MalformedInput(
            "TTL must be a positive duration".to_string(),
        ));
    }
    if ttl > MAX_TTL {
        return Err(CacheError::MalformedInput(format!(
            "TTL exceeds maximum of {} seconds",
            MAX_TTL.as_secs()
        )));
    }
    Ok(())
}
