//! HTTP server command
//!
//! Runs the superheroes server with API, auth and dashboard routes.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use superheroes_core::AppConfig;

use superheroes_server::db::{create_pool_with_options, migrations};
use superheroes_server::http::{run_server, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug, Default)]
pub struct ServeArgs {
    /// Address to bind to (default from config: 127.0.0.1:8787)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Database URL (overrides config and DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Allow permissive CORS (all origins, no credentials) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Trusted origin for credentialed CORS (repeatable; replaces config list)
    #[arg(long = "trusted-origin", value_name = "ORIGIN")]
    pub trusted_origins: Vec<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl ServeArgs {
    /// Layer command-line flags over the loaded config
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(bind) = self.bind {
            config.server.bind = bind;
        }
        if let Some(url) = &self.database_url {
            config.database.url = url.clone();
        }
        if self.cors_permissive {
            config.server.cors_permissive = true;
        }
        if !self.trusted_origins.is_empty() {
            config.server.trusted_origins = self.trusted_origins.clone();
        }
        if let Some(timeout) = self.timeout {
            config.server.request_timeout_secs = timeout;
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, mut config: AppConfig) -> Result<()> {
    args.apply(&mut config);
    config.validate().context("Invalid server configuration")?;

    if config.uses_default_secret() {
        tracing::warn!("AUTH_SECRET is not set; using the built-in development secret");
    }

    tracing::info!(database = %config.database.url, "Starting superheroes server on {}", config.server.bind);

    let pool = create_pool_with_options(&config.database.url, config.database.max_connections)
        .await
        .context("Failed to create database pool")?;

    migrations::run(&pool)
        .await
        .context("Failed to run migrations")?;

    // Run server (blocks until shutdown)
    run_server(pool, ServerConfig::from(&config))
        .await
        .context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let mut config = AppConfig::default();
        let args = ServeArgs {
            bind: Some("0.0.0.0:9000".parse().unwrap()),
            database_url: Some("sqlite::memory:".into()),
            cors_permissive: false,
            trusted_origins: vec!["https://heroes.example".into()],
            timeout: Some(5),
        };

        args.apply(&mut config);

        assert_eq!(config.server.bind.port(), 9000);
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.server.trusted_origins, vec!["https://heroes.example"]);
        assert_eq!(config.server.request_timeout_secs, 5);
        assert!(!config.server.cors_permissive);
    }

    #[test]
    fn no_flags_keep_config() {
        let mut config = AppConfig::default();
        ServeArgs::default().apply(&mut config);
        assert_eq!(config, AppConfig::default());
    }
}
