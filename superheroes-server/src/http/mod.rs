//! HTTP server layer
//!
//! Axum server with:
//! - CORS restricted to trusted origins, credentials allowed
//! - Request tracing and timeouts
//! - Graceful shutdown
//! - JSON error responses for the API, redirects for pages

pub mod server;
pub mod error;
pub mod extractors;
pub mod routes;

pub use server::{build_router, run_server, AppState, ServerConfig, ServerError};
pub use error::ApiError;
