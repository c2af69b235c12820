//! Sign-up, sign-in, session lookup and sign-out

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use sqlx::SqlitePool;
use superheroes_core::{AuthSection, MAX_SESSION_TTL_HOURS};

use super::{password, token};
use crate::db::repos::{DbError, SessionRepo, SessionWithUser, User, UserRepo};
use crate::models::{Email, Password, ValidationError};

/// Hash checked when the email is unknown, so both failure paths cost the same
static DUMMY_HASH: Lazy<Option<String>> = Lazy::new(|| {
    Password::new("dummy-password-for-timing")
        .ok()
        .and_then(|pw| password::hash(&pw).ok())
});

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Unknown email or wrong password; callers cannot tell which
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("an account with this email already exists")]
    EmailTaken,

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("session expiry is out of range")]
    ExpiryOutOfRange,

    #[error(transparent)]
    Db(DbError),
}

impl From<DbError> for AuthError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::Conflict { resource: "user", .. } => Self::EmailTaken,
            other => Self::Db(other),
        }
    }
}

/// Session tuning taken from `[auth]` config
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub secret: String,
    pub session_ttl: Duration,
    pub secure_cookies: bool,
}

impl From<&AuthSection> for AuthSettings {
    fn from(section: &AuthSection) -> Self {
        let hours = section.session_ttl_hours.clamp(1, MAX_SESSION_TTL_HOURS);
        Self {
            secret: section.secret.clone(),
            session_ttl: Duration::try_hours(hours).unwrap_or(Duration::MAX),
            secure_cookies: section.secure_cookies,
        }
    }
}

/// The signed-in user behind a session
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub user_created_at: DateTime<Utc>,
    pub session_id: String,
    pub session_created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<SessionWithUser> for SessionUser {
    fn from(s: SessionWithUser) -> Self {
        Self {
            user_id: s.session.user_id,
            email: s.user_email,
            name: s.user_name,
            user_created_at: s.user_created_at,
            session_id: s.session.id,
            session_created_at: s.session.created_at,
            expires_at: s.session.expires_at,
        }
    }
}

/// Result of a successful sign-up or sign-in. `token` goes in the cookie.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub token: String,
    pub user: SessionUser,
}

#[derive(Clone)]
pub struct AuthService {
    pool: SqlitePool,
    settings: Arc<AuthSettings>,
}

impl AuthService {
    pub fn new(pool: SqlitePool, settings: AuthSettings) -> Self {
        Self {
            pool,
            settings: Arc::new(settings),
        }
    }

    pub fn settings(&self) -> &AuthSettings {
        &self.settings
    }

    /// Register a new account and start a session for it.
    ///
    /// A blank `name` falls back to the local part of the email.
    pub async fn sign_up(
        &self,
        email: &str,
        name: &str,
        password: &str,
        user_agent: Option<&str>,
    ) -> Result<SignedIn, AuthError> {
        let email = Email::new(email)?;
        let password = Password::new(password)?;
        let name = match name.trim() {
            "" => email.as_str().split('@').next().unwrap_or_default().to_string(),
            n => n.to_string(),
        };

        let phc = tokio::task::spawn_blocking(move || password::hash(&password))
            .await
            .map_err(|e| AuthError::Hash(e.to_string()))?
            .map_err(|e| AuthError::Hash(e.to_string()))?;

        let user = UserRepo::new(&self.pool).create(&email, &name, &phc).await?;
        tracing::info!(user_id = %user.id, "account created");

        self.start_session(user, user_agent).await
    }

    /// Check credentials and start a session.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
        user_agent: Option<&str>,
    ) -> Result<SignedIn, AuthError> {
        let email = Email::new(email).map_err(|_| AuthError::InvalidCredentials)?;
        let user = UserRepo::new(&self.pool).find_by_email(&email).await?;

        let phc = match &user {
            Some(u) => Some(u.password_hash.clone()),
            None => DUMMY_HASH.clone(),
        };
        let plain = password.to_owned();
        let verified = match phc {
            Some(phc) => tokio::task::spawn_blocking(move || password::verify(&plain, &phc))
                .await
                .map_err(|e| AuthError::Hash(e.to_string()))?,
            None => false,
        };

        match user {
            Some(user) if verified => self.start_session(user, user_agent).await,
            _ => {
                tracing::info!(email = %email.as_str(), "sign-in rejected");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Resolve a cookie token to its active session, if any.
    pub async fn session(&self, token: &str) -> Result<Option<SessionUser>, AuthError> {
        let digest = token::digest(&self.settings.secret, token);
        let found = SessionRepo::new(&self.pool)
            .find_active(&digest, Utc::now())
            .await?;
        Ok(found.map(SessionUser::from))
    }

    /// End the session behind `token`. Unknown tokens are ignored.
    pub async fn sign_out(&self, token: &str) -> Result<(), AuthError> {
        let digest = token::digest(&self.settings.secret, token);
        if SessionRepo::new(&self.pool).delete(&digest).await? {
            tracing::info!("session ended");
        }
        Ok(())
    }

    /// Drop expired sessions. Returns the number removed.
    pub async fn purge_expired(&self) -> Result<u64, AuthError> {
        Ok(SessionRepo::new(&self.pool).purge_expired(Utc::now()).await?)
    }

    async fn start_session(
        &self,
        user: User,
        user_agent: Option<&str>,
    ) -> Result<SignedIn, AuthError> {
        let token = token::generate();
        let digest = token::digest(&self.settings.secret, &token);
        let expires_at = Utc::now()
            .checked_add_signed(self.settings.session_ttl)
            .ok_or(AuthError::ExpiryOutOfRange)?;

        let session = SessionRepo::new(&self.pool)
            .create(&user.id, &digest, expires_at, user_agent)
            .await?;
        tracing::debug!(user_id = %user.id, session_id = %session.id, "session started");

        Ok(SignedIn {
            token,
            user: SessionUser {
                user_id: user.id,
                email: user.email,
                name: user.name,
                user_created_at: user.created_at,
                session_id: session.id,
                session_created_at: session.created_at,
                expires_at: session.expires_at,
            },
        })
    }
}
