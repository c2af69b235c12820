//! Repository implementations for database access
//!
//! Each repository borrows the pool and follows these patterns:
//! - Single statement per call
//! - Handles conflicts via constraint errors (no check-then-insert)

pub mod superheroes;
pub mod users;
pub mod sessions;

pub use superheroes::{Superhero, SuperheroRepo};
pub use users::{User, UserRepo};
pub use sessions::{Session, SessionRepo, SessionWithUser};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("conflict: {resource} '{id}' already exists")]
    Conflict { resource: &'static str, id: String },
}

/// True when the error is a UNIQUE constraint violation
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
