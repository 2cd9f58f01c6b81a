//! Error types for the record cache
//!
//! Provides unified error handling using thiserror.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the record cache.
///
/// A cache miss is not an error: store lookups return `Ok(None)`.
/// `NotFound` only exists so the HTTP layer can answer 404.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Caller-supplied key, TTL or payload was rejected before touching the backend
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// No live record under the requested key
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Backing store could not be reached
    #[error("Backing store unavailable: {0}")]
    BackendUnavailable(String),

    /// Backing store answered with an error reply (bad command, wrong type)
    #[error("Backing store error: {0}")]
    BackendFailure(String),

    /// Backing store did not answer within the operation timeout
    #[error("Backing store timed out after {0:?}")]
    Timeout(Duration),

    /// A payload written by this store could not be read back
    #[error("Integrity error for key '{key}': {reason}")]
    Integrity { key: String, reason: String },

    /// The system of record failed while loading a missed key
    #[error("System of record failed: {0}")]
    Source(#[from] anyhow::Error),
}

impl CacheError {
    /// HTTP status code this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            CacheError::MalformedInput(_) => StatusCode::BAD_REQUEST,
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::BackendUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::BackendFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            CacheError::Integrity { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::Source(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Only connectivity failures count as an outage; anything Redis answered
/// itself is a server error.
impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        let unreachable = err.kind() == redis::ErrorKind::IoError
            || err.is_io_error()
            || err.is_connection_refusal()
            || err.is_connection_dropped()
            || err.is_timeout();

        if unreachable {
            CacheError::BackendUnavailable(err.to_string())
        } else {
            CacheError::BackendFailure(err.to_string())
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse::new(self.to_string()));
        (self.status_code(), body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the record cache.
pub type Result<T> = std::result::Result<T, CacheError>;
