//! Subcommand implementations

pub mod heroes;
pub mod migrate;
pub mod serve;

pub use heroes::run_heroes;
pub use migrate::run_migrate;
pub use serve::run_serve;
