//! Request and Response models for the record cache API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod record;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use record::{Price, Record};
pub use requests::PutQuery;
pub use responses::{ErrorResponse, HealthResponse, StatsResponse};
