/// Structured error types for superheroes-core.
///
/// The CLI wraps these in `anyhow` with context; library callers can match
/// on the variants directly.
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration loading and saving errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Reading or writing the config file failed
    #[error("I/O error on {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },

    /// The file exists but is not valid TOML for `AppConfig`
    #[error("Failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Serializing the config back to TOML failed
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value is present but unusable
    #[error("Invalid configuration: {reason}")]
    Invalid { reason: String },
}

/// Result type alias for superheroes-core operations
pub type Result<T> = std::result::Result<T, ConfigError>;

impl ConfigError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::invalid("session_ttl_hours must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: session_ttl_hours must be positive"
        );

        let err = ConfigError::io(
            "/tmp/missing.toml",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/tmp/missing.toml"));
    }
}
