//! Email/password authentication with server-side sessions
//!
//! - Passwords are stored as argon2id PHC strings
//! - Session tokens are random, handed out once in a cookie, and stored
//!   only as a keyed SHA-256 digest

pub mod cookie;
pub mod password;
pub mod service;
pub mod token;

pub use cookie::SESSION_COOKIE;
pub use service::{AuthError, AuthService, AuthSettings, SessionUser, SignedIn};
