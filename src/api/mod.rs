//! API Module
//!
//! HTTP handlers and routing for the record cache REST API.
//!
//! # Endpoints
//! - `GET /record/:id` - Fetch a cached record
//! - `POST /record` - Cache a record under its id
//! - `DELETE /record/:id` - Drop a cached record
//! - `GET /stats` - Store traffic counters
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
