//! superheroes-server: list/create API, session auth and dashboard pages
//!
//! A small CRUD service over one SQLite table. The JSON API lives under
//! `/super-heroes`, authentication under `/api/auth`, and the
//! session-gated dashboard under `/dashboard`.

pub mod auth;
pub mod db;
pub mod http;
pub mod models;
pub mod templates;

#[cfg(test)]
pub(crate) mod testing;

pub use http::{build_router, run_server, AppState, ServerConfig, ServerError};
