//! Database layer - connection pool, migrations and repositories
//!
//! # Design Principles
//!
//! - Connection pool, no Arc<Mutex<Connection>>
//! - Rely on DB constraints, handle conflicts - no check-then-insert
//! - One statement per operation; INSERT ... RETURNING instead of re-reading

pub mod migrations;
pub mod pool;
pub mod repos;

pub use pool::{create_pool, create_pool_with_options};
pub use repos::*;

/// Current time as unix seconds, the storage format for every timestamp column
pub(crate) fn now_ts() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Convert stored unix seconds back to a UTC timestamp
pub(crate) fn from_ts(secs: i64) -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::from_timestamp(secs, 0).unwrap_or_default()
}
