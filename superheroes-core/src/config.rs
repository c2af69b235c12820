use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Secret used when nothing is configured. Fine for local demos only.
pub const DEFAULT_AUTH_SECRET: &str = "superheroes-dev-secret-change-me";

/// Longest accepted session lifetime (ten years)
pub const MAX_SESSION_TTL_HOURS: i64 = 87_600;

/// Centralized configuration for the superheroes server and CLI
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub auth: AuthSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Address the HTTP server binds to
    pub bind: SocketAddr,
    /// Base URL the CLI client talks to
    pub public_url: String,
    /// Origins allowed to make credentialed cross-origin requests
    pub trusted_origins: Vec<String>,
    /// Allow any origin (no credentials). Development only.
    pub cors_permissive: bool,
    pub request_timeout_secs: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8787)),
            public_url: "http://127.0.0.1:8787".to_string(),
            trusted_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:8787".to_string(),
                "http://127.0.0.1:8787".to_string(),
            ],
            cors_permissive: false,
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: "sqlite://superheroes.db".to_string(),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSection {
    /// Key mixed into stored session token digests
    pub secret: String,
    pub session_ttl_hours: i64,
    /// Add `Secure` to the session cookie (enable behind HTTPS)
    pub secure_cookies: bool,
}

impl Default for AuthSection {
    fn default() -> Self {
        Self {
            secret: DEFAULT_AUTH_SECRET.to_string(),
            session_ttl_hours: 168,
            secure_cookies: false,
        }
    }
}

impl AppConfig {
    /// Get config file path: ~/.superheroes/config.toml
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".superheroes")
            .join("config.toml")
    }

    /// Load config from `path`, or the default location when `None`.
    ///
    /// A missing file yields the defaults. Environment overrides are applied
    /// afterwards and the result is validated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::config_path);

        let mut config = Self::load_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Read a config file without applying environment overrides.
    pub fn load_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply overrides from a key lookup (normally the process environment).
    ///
    /// Recognized keys: `DATABASE_URL`, `AUTH_SECRET`, `TRUSTED_ORIGINS`
    /// (comma-separated) and `SUPERHEROES_SERVER_URL`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.is_empty()) {
            self.database.url = url;
        }
        if let Some(secret) = lookup("AUTH_SECRET").filter(|v| !v.is_empty()) {
            self.auth.secret = secret;
        }
        if let Some(origins) = lookup("TRUSTED_ORIGINS") {
            let origins: Vec<String> = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
            if !origins.is_empty() {
                self.server.trusted_origins = origins;
            }
        }
        if let Some(url) = lookup("SUPERHEROES_SERVER_URL").filter(|v| !v.is_empty()) {
            self.server.public_url = url;
        }
    }

    /// Reject values the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::invalid("database.max_connections must be at least 1"));
        }
        if self.auth.session_ttl_hours <= 0 {
            return Err(ConfigError::invalid("auth.session_ttl_hours must be positive"));
        }
        if self.auth.session_ttl_hours > MAX_SESSION_TTL_HOURS {
            return Err(ConfigError::invalid(format!(
                "auth.session_ttl_hours must be at most {MAX_SESSION_TTL_HOURS}"
            )));
        }
        if self.server.trusted_origins.iter().any(|o| o == "*") {
            return Err(ConfigError::invalid(
                "server.trusted_origins cannot contain \"*\"; set server.cors_permissive instead",
            ));
        }
        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::invalid("server.request_timeout_secs must be positive"));
        }
        if self.auth.secret.is_empty() {
            return Err(ConfigError::invalid("auth.secret cannot be empty"));
        }
        Ok(())
    }

    /// True when the auth secret was never changed from the built-in default
    pub fn uses_default_secret(&self) -> bool {
        self.auth.secret == DEFAULT_AUTH_SECRET
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save config to `path`, creating the parent directory.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
        }

        fs::write(path, self.to_toml_string()?).map_err(|e| ConfigError::io(path, e))
    }
}
