//! Shared helpers for router tests

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::header::SET_COOKIE;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use tower::ServiceExt;

use crate::auth::SESSION_COOKIE;
use crate::db::{create_pool, migrations};
use crate::http::{build_router, AppState, ServerConfig};

/// Router over a fresh in-memory database
pub(crate) async fn test_app() -> (Router, Arc<AppState>) {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    migrations::run(&pool).await.unwrap();

    let config = ServerConfig::default();
    let state = Arc::new(AppState::new(pool, config.auth.clone()));
    let app = build_router(state.clone(), &config).unwrap();
    (app, state)
}

pub(crate) async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub(crate) async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

/// `name=value` pair of the session cookie set by `response`, if any
pub(crate) fn session_cookie_from(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .find(|pair| pair.starts_with(SESSION_COOKIE) && !pair.ends_with('='))
        .map(str::to_string)
}

/// Register through the JSON API and return the cookie to send back
pub(crate) async fn sign_up_cookie(app: &Router, email: &str, password: &str) -> String {
    let body = serde_json::json!({ "email": email, "password": password }).to_string();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/sign-up/email")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    session_cookie_from(&response).expect("sign-up sets a session cookie")
}
