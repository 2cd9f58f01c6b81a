//! Record Cache - a cache-aside HTTP front for structured records
//!
//! Typed get/put/delete with per-entry TTL over an in-memory or Redis
//! backing store.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::RecordStore;
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::spawn_cleanup_task;
