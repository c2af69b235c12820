//! Axum server setup
//!
//! Server skeleton with:
//! - CORS limited to trusted origins (credentials allowed)
//! - Tracing and timeout middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::header::{
    ACCESS_CONTROL_ALLOW_ORIGIN, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE,
};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::Router;
use sqlx::SqlitePool;
use superheroes_core::AppConfig;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::routes;
use crate::auth::{AuthService, AuthSettings};

/// Preflight cache lifetime sent in `Access-Control-Max-Age`
const CORS_MAX_AGE: Duration = Duration::from_secs(600);

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8787)
    pub bind_addr: SocketAddr,

    /// Origins allowed to make credentialed cross-origin requests
    pub trusted_origins: Vec<String>,

    /// Allow permissive CORS (default: false = trusted origins only)
    ///
    /// WARNING: Setting this to true allows any origin, without credentials.
    /// Only use for development.
    pub cors_permissive: bool,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Session settings
    pub auth: AuthSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for ServerConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            bind_addr: config.server.bind,
            trusted_origins: config.server.trusted_origins.clone(),
            cors_permissive: config.server.cors_permissive,
            request_timeout: Duration::from_secs(config.server.request_timeout_secs),
            auth: AuthSettings::from(&config.auth),
        }
    }
}

/// Shared application state
pub struct AppState {
    pub pool: SqlitePool,
    pub auth: AuthService,
}

impl AppState {
    pub fn new(pool: SqlitePool, auth: AuthSettings) -> Self {
        let auth = AuthService::new(pool.clone(), auth);
        Self { pool, auth }
    }
}

/// Build the CORS layer for the configured origins.
pub fn cors_layer(config: &ServerConfig) -> Result<CorsLayer, ServerError> {
    if config.cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        return Ok(CorsLayer::permissive());
    }

    let origins = config
        .trusted_origins
        .iter()
        .map(|o| match o.as_str() {
            "*" => Err(ServerError::InvalidOrigin(o.clone())),
            _ => HeaderValue::from_str(o).map_err(|_| ServerError::InvalidOrigin(o.clone())),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_headers([CONTENT_TYPE, AUTHORIZATION, ACCESS_CONTROL_ALLOW_ORIGIN])
        .allow_methods([
            Method::POST,
            Method::GET,
            Method::OPTIONS,
            Method::PUT,
            Method::DELETE,
        ])
        .expose_headers([CONTENT_LENGTH, ACCESS_CONTROL_ALLOW_ORIGIN])
        .max_age(CORS_MAX_AGE)
        .allow_credentials(true))
}

/// Build the application router with all routes and middleware.
pub fn build_router(state: Arc<AppState>, config: &ServerConfig) -> Result<Router, ServerError> {
    let cors = cors_layer(config)?;

    Ok(Router::new()
        .merge(routes::health::router())
        .merge(routes::superheroes::router())
        .merge(routes::auth::router())
        .merge(routes::pages::router())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state))
}

/// Run the HTTP server.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&database_url).await?;
/// migrations::run(&pool).await?;
/// run_server(pool, ServerConfig::default()).await?;
/// ```
pub async fn run_server(pool: SqlitePool, config: ServerConfig) -> Result<(), ServerError> {
    let state = Arc::new(AppState::new(pool, config.auth.clone()));

    match state.auth.purge_expired().await {
        Ok(0) => {}
        Ok(n) => tracing::info!(removed = n, "purged expired sessions"),
        Err(e) => tracing::warn!("could not purge expired sessions: {}", e),
    }

    let app = build_router(state, &config)?;

    // Bind listener
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on http://{}", config.bind_addr);

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid CORS origin: {0}")]
    InvalidOrigin(String),
}
