//! API Handlers
//!
//! HTTP request handlers for each record cache endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};

use crate::cache::{CacheBackend, RecordStore};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{HealthResponse, PutQuery, Record, StatsResponse};

/// Application state shared across all handlers.
///
/// The store is an explicit handle; handlers never reach for global state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Cache-aside record store
    pub store: RecordStore,
    /// TTL for records posted without `?ttl=`
    pub default_ttl: Duration,
}

impl AppState {
    /// Creates a new AppState with the given store.
    pub fn new(store: RecordStore, default_ttl: Duration) -> Self {
        Self { store, default_ttl }
    }

    /// Creates a new AppState over `backend`, applying the configured key
    /// prefix, operation timeout and default TTL.
    pub fn from_config(config: &Config, backend: Arc<dyn CacheBackend>) -> Self {
        let store = RecordStore::new(backend)
            .with_prefix(config.key_prefix.clone())
            .with_timeout(config.operation_timeout());
        Self::new(store, config.default_ttl())
    }
}

/// Handler for GET /record/:id
///
/// Returns the cached record, or 404 on a miss.
pub async fn get_record_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Record>> {
    state
        .store
        .get::<Record>(&id)
        .await?
        .map(Json)
        .ok_or(CacheError::NotFound(id))
}

/// Handler for POST /record
///
/// Caches the posted record under its `id` and echoes it back.
pub async fn put_record_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<PutQuery>, QueryRejection>,
    payload: std::result::Result<Json<Record>, JsonRejection>,
) -> Result<Json<Record>> {
    let Query(query) = query.map_err(|e| CacheError::MalformedInput(e.body_text()))?;
    let Json(record) = payload.map_err(|e| CacheError::MalformedInput(e.body_text()))?;

    if let Some(error_msg) = record.validate() {
        return Err(CacheError::MalformedInput(error_msg));
    }

    let ttl = query.ttl_or(state.default_ttl);
    state.store.put(&record.id, &record, ttl).await?;

    Ok(Json(record))
}

/// Handler for DELETE /record/:id
///
/// Always 204 when the backend answers, whether or not the key existed.
pub async fn delete_record_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.store.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let evictions = state.store.evictions().await;
    Json(StatsResponse::new(state.store.stats(), evictions))
}

/// Handler for GET /health
///
/// Reports 503 while the backing store is unreachable.
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.store.ping().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse::healthy())),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse::degraded()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryBackend;

    fn test_state() -> AppState {
        let store = RecordStore::new(Arc::new(MemoryBackend::new(100)));
        AppState::new(store, Duration::from_secs(1800))
    }

    fn widget() -> Record {
        Record::new("p1", "Widget", "9.99".parse().unwrap())
    }

    #[tokio::test]
    async fn test_put_and_get_handler() {
        let state = test_state();

        let result = put_record_handler(
            State(state.clone()),
            Ok(Query(PutQuery::default())),
            Ok(Json(widget())),
        )
        .await;
        assert_eq!(result.unwrap().0, widget());

        let response = get_record_handler(State(state), Path("p1".to_string()))
            .await
            .unwrap();
        assert_eq!(response.0, widget());
    }

    #[tokio::test]
    async fn test_get_nonexistent_record() {
        let result = get_record_handler(State(test_state()), Path("nonexistent".to_string())).await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_handler_is_idempotent() {
        let state = test_state();
        let stored = put_record_handler(
            State(state.clone()),
            Ok(Query(PutQuery::default())),
            Ok(Json(widget())),
        )
        .await
        .unwrap();
        assert_eq!(stored.0, widget());

        for _ in 0..2 {
            let status = delete_record_handler(State(state.clone()), Path("p1".to_string()))
                .await
                .unwrap();
            assert_eq!(status, StatusCode::NO_CONTENT);
        }

        let result = get_record_handler(State(state), Path("p1".to_string())).await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_put_empty_id_rejected() {
        let record = Record::new("", "Widget", "1".parse().unwrap());
        let result =
            put_record_handler(State(test_state()), Ok(Query(PutQuery::default())), Ok(Json(record)))
                .await;
        assert!(matches!(result, Err(CacheError::MalformedInput(_))));
    }

    #[tokio::test]
    async fn test_put_zero_ttl_rejected() {
        let result = put_record_handler(
            State(test_state()),
            Ok(Query(PutQuery { ttl: Some(0) })),
            Ok(Json(widget())),
        )
        .await;
        assert!(matches!(result, Err(CacheError::MalformedInput(_))));
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = test_state();
        let _ = get_record_handler(State(state.clone()), Path("p1".to_string())).await;

        let response = stats_handler(State(state)).await;
        assert_eq!(response.hits, 0);
        assert_eq!(response.misses, 1);
        assert_eq!(response.evictions, 0);
    }

    #[tokio::test]
    async fn test_stats_handler_reports_evictions() {
        let store = RecordStore::new(Arc::new(MemoryBackend::new(1)));
        let state = AppState::new(store, Duration::from_secs(1800));

        for id in ["p1", "p2", "p3"] {
            let record = Record::new(id, "Widget", "1.00".parse().unwrap());
            let stored = put_record_handler(
                State(state.clone()),
                Ok(Query(PutQuery::default())),
                Ok(Json(record)),
            )
            .await
            .unwrap();
            assert_eq!(stored.0.id, id);
        }

        let response = stats_handler(State(state)).await;
        assert_eq!(response.writes, 3);
        assert_eq!(response.evictions, 2);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let (status, response) = health_handler(State(test_state())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response.status, "healthy");
    }
}
