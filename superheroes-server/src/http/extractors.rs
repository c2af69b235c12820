//! Custom Axum extractors

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::USER_AGENT;
use axum::http::request::Parts;

use super::error::ApiError;
use super::server::AppState;
use crate::auth::{cookie, SessionUser};

/// Session from the request cookie, or `None` when absent or expired.
///
/// Pages use this to decide between rendering and redirecting to login.
pub struct MaybeSession(pub Option<SessionUser>);

impl FromRequestParts<Arc<AppState>> for MaybeSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = cookie::session_token(&parts.headers) else {
            return Ok(Self(None));
        };

        let user = state.auth.session(&token).await?;
        Ok(Self(user))
    }
}

/// Raw session token from the cookie, if present
pub struct SessionToken(pub Option<String>);

impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(cookie::session_token(&parts.headers)))
    }
}

/// `User-Agent` header, recorded on new sessions
pub struct UserAgent(pub Option<String>);

impl<S> FromRequestParts<S> for UserAgent
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ua = parts
            .headers
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Ok(Self(ua))
    }
}
