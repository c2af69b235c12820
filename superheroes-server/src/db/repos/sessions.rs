//! Session repository
//!
//! Only token digests are stored. Lookups join the owning user and skip
//! expired rows, so an expired session behaves exactly like a missing one.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use super::DbError;
use crate::db::{from_ts, now_ts};

/// Session record
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub user_agent: Option<String>,
}

/// Active session joined with its user
#[derive(Debug, Clone)]
pub struct SessionWithUser {
    pub session: Session,
    pub user_email: String,
    pub user_name: String,
    pub user_created_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct SessionRow {
    id: String,
    user_id: String,
    expires_at: i64,
    created_at: i64,
    user_agent: Option<String>,
}

impl From<SessionRow> for Session {
    fn from(r: SessionRow) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            expires_at: from_ts(r.expires_at),
            created_at: from_ts(r.created_at),
            user_agent: r.user_agent,
        }
    }
}

#[derive(FromRow)]
struct SessionUserRow {
    id: String,
    user_id: String,
    expires_at: i64,
    created_at: i64,
    user_agent: Option<String>,
    email: String,
    name: String,
    user_created_at: i64,
}

/// Session repository
pub struct SessionRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SessionRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: &str,
        token_hash: &str,
        expires_at: DateTime<Utc>,
        user_agent: Option<&str>,
    ) -> Result<Session, DbError> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            INSERT INTO sessions (id, token_hash, user_id, expires_at, created_at, user_agent)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING id, user_id, expires_at, created_at, user_agent
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(token_hash)
        .bind(user_id)
        .bind(expires_at.timestamp())
        .bind(now_ts())
        .bind(user_agent)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Find a session by token digest that has not expired at `now`.
    pub async fn find_active(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<SessionWithUser>, DbError> {
        let row = sqlx::query_as::<_, SessionUserRow>(
            r#"
            SELECT s.id, s.user_id, s.expires_at, s.created_at, s.user_agent,
                   u.email, u.name, u.created_at AS user_created_at
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token_hash = ?1 AND s.expires_at > ?2
            "#,
        )
        .bind(token_hash)
        .bind(now.timestamp())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| SessionWithUser {
            session: Session {
                id: r.id,
                user_id: r.user_id,
                expires_at: from_ts(r.expires_at),
                created_at: from_ts(r.created_at),
                user_agent: r.user_agent,
            },
            user_email: r.email,
            user_name: r.name,
            user_created_at: from_ts(r.user_created_at),
        }))
    }

    /// Delete a session. Returns whether a row was removed.
    pub async fn delete(&self, token_hash: &str) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = ?1")
            .bind(token_hash)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove every session that expired at or before `now`.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?1")
            .bind(now.timestamp())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
