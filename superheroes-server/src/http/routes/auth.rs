//! JSON auth endpoints under /api/auth

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::{cookie, SessionUser, SignedIn};
use crate::http::error::ApiError;
use crate::http::extractors::{MaybeSession, SessionToken, UserAgent};
use crate::http::server::AppState;

#[derive(Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub id: String,
    pub user_id: String,
    pub created_at: String,
    pub expires_at: String,
}

/// Body of sign-up, sign-in and get-session
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: UserResponse,
    pub session: SessionInfo,
}

impl From<SessionUser> for SessionResponse {
    fn from(u: SessionUser) -> Self {
        Self {
            user: UserResponse {
                id: u.user_id.clone(),
                email: u.email,
                name: u.name,
                created_at: u.user_created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            },
            session: SessionInfo {
                id: u.session_id,
                user_id: u.user_id,
                created_at: u.session_created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
                expires_at: u.expires_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            },
        }
    }
}

fn bad_json(e: JsonRejection) -> ApiError {
    ApiError::BadRequest {
        message: e.body_text(),
    }
}

/// Session JSON plus the cookie that carries the new token
fn signed_in_response(state: &AppState, signed: SignedIn) -> Response {
    let settings = state.auth.settings();
    let set_cookie = cookie::session_cookie(
        &signed.token,
        settings.session_ttl.num_seconds(),
        settings.secure_cookies,
    );

    (
        AppendHeaders([(SET_COOKIE, set_cookie)]),
        Json(SessionResponse::from(signed.user)),
    )
        .into_response()
}

/// POST /api/auth/sign-up/email
async fn sign_up(
    State(state): State<Arc<AppState>>,
    UserAgent(ua): UserAgent,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload.map_err(bad_json)?;
    let signed = state
        .auth
        .sign_up(&req.email, &req.name, &req.password, ua.as_deref())
        .await?;

    Ok(signed_in_response(&state, signed))
}

/// POST /api/auth/sign-in/email
async fn sign_in(
    State(state): State<Arc<AppState>>,
    UserAgent(ua): UserAgent,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload.map_err(bad_json)?;
    let signed = state
        .auth
        .sign_in(&req.email, &req.password, ua.as_deref())
        .await?;

    Ok(signed_in_response(&state, signed))
}

/// POST /api/auth/sign-out
async fn sign_out(
    State(state): State<Arc<AppState>>,
    SessionToken(token): SessionToken,
) -> Result<Response, ApiError> {
    if let Some(token) = token {
        state.auth.sign_out(&token).await?;
    }

    let clear = cookie::clear_cookie(state.auth.settings().secure_cookies);
    Ok((
        AppendHeaders([(SET_COOKIE, clear)]),
        Json(json!({ "success": true })),
    )
        .into_response())
}

/// GET /api/auth/get-session - `null` when signed out
async fn get_session(MaybeSession(user): MaybeSession) -> Json<Option<SessionResponse>> {
    Json(user.map(SessionResponse::from))
}

/// Auth API routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/sign-up/email", post(sign_up))
        .route("/api/auth/sign-in/email", post(sign_in))
        .route("/api/auth/sign-out", post(sign_out))
        .route("/api/auth/get-session", get(get_session))
}
