//! superheroes-core: configuration shared by the server and the CLI.

pub mod config;
pub mod error;

pub use config::{AppConfig, AuthSection, DatabaseSection, ServerSection, MAX_SESSION_TTL_HOURS};
pub use error::{ConfigError, Result};
