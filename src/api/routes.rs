//! API Routes
//!
//! Configures the Axum router with all record cache endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_record_handler, get_record_handler, health_handler, put_record_handler, stats_handler,
    AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /record/:id` - Fetch a cached record
/// - `POST /record` - Cache a record under its id
/// - `DELETE /record/:id` - Drop a cached record
/// - `GET /stats` - Store traffic counters
/// - `GET /health` - Health check, including backend reachability
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/record", post(put_record_handler))
        .route(
            "/record/:id",
            get(get_record_handler).delete(delete_record_handler),
        )
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
