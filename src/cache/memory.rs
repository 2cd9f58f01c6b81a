//! Memory Backend Module
//!
//! In-process backing store: HashMap storage with lazy expiry on read,
//! an LRU capacity bound and an explicit sweep for expired entries.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{CacheBackend, CacheEntry, Clock, LruTracker, SystemClock};
use crate::error::Result;

// == Memory State ==
#[derive(Debug)]
struct MemoryState {
    entries: HashMap<String, CacheEntry>,
    lru: LruTracker,
    max_entries: usize,
    evictions: u64,
}

impl MemoryState {
    fn insert(&mut self, key: &str, entry: CacheEntry) {
        let is_overwrite = self.entries.contains_key(key);

        // Capacity eviction is indistinguishable from expiry to readers
        if !is_overwrite && self.entries.len() >= self.max_entries {
            if let Some(evicted) = self.lru.evict_oldest() {
                self.entries.remove(&evicted);
                self.evictions += 1;
                debug!(key = %evicted, "Evicted least recently used entry");
            }
        }

        self.entries.insert(key.to_string(), entry);
        self.lru.touch(key);
    }

    fn lookup(&mut self, key: &str, now_ms: u64) -> Option<String> {
        let expired = self.entries.get(key)?.is_expired(now_ms);
        if expired {
            self.entries.remove(key);
            self.lru.remove(key);
            return None;
        }

        self.lru.touch(key);
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
        self.lru.remove(key);
    }

    fn purge_expired(&mut self, now_ms: u64) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now_ms))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.remove(key);
        }
        expired_keys.len()
    }
}

// == Memory Backend ==
/// Process-local backing store.
#[derive(Debug)]
pub struct MemoryBackend {
    state: RwLock<MemoryState>,
    clock: Arc<dyn Clock>,
}

impl MemoryBackend {
    // == Constructor ==
    /// Creates an empty backend holding at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self::with_clock(max_entries, Arc::new(SystemClock))
    }

    /// Creates an empty backend that reads time from `clock`.
    pub fn with_clock(max_entries: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: RwLock::new(MemoryState {
                entries: HashMap::new(),
                lru: LruTracker::new(),
                max_entries: max_entries.max(1),
                evictions: 0,
            }),
            clock,
        }
    }

    // == Purge Expired ==
    /// Removes all expired entries. Returns the number removed.
    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.now_ms();
        self.state.write().await.purge_expired(now)
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.entries.is_empty()
    }

    /// Whether `key` is physically present, expired or not.
    pub async fn contains_key(&self, key: &str) -> bool {
        self.state.read().await.entries.contains_key(key)
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn fetch(&self, key: &str) -> Result<Option<String>> {
        let now = self.clock.now_ms();
        // Write lock: reads update LRU order and drop expired entries
        Ok(self.state.write().await.lookup(key, now))
    }

    async fn store(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        let entry = CacheEntry::new(value, ttl, self.clock.now_ms());
        self.state.write().await.insert(key, entry);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.state.write().await.remove(key);
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn evictions(&self) -> u64 {
        self.state.read().await.evictions
    }
}
