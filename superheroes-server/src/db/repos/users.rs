//! User repository
//!
//! Email uniqueness is enforced by the UNIQUE constraint; a violation
//! surfaces as `DbError::Conflict`.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use super::{is_unique_violation, DbError};
use crate::db::{from_ts, now_ts};
use crate::models::Email;

/// User record. `password_hash` is an argon2 PHC string.
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct UserRow {
    id: String,
    email: String,
    name: String,
    password_hash: String,
    created_at: i64,
    updated_at: i64,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        Self {
            id: r.id,
            email: r.email,
            name: r.name,
            password_hash: r.password_hash,
            created_at: from_ts(r.created_at),
            updated_at: from_ts(r.updated_at),
        }
    }
}

/// User repository
pub struct UserRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a user. Returns `Conflict` if the email is taken.
    pub async fn create(
        &self,
        email: &Email,
        name: &str,
        password_hash: &str,
    ) -> Result<User, DbError> {
        let id = Uuid::new_v4().to_string();
        let now = now_ts();

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, email, name, password_hash, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            RETURNING id, email, name, password_hash, created_at, updated_at
            "#,
        )
        .bind(&id)
        .bind(email.as_str())
        .bind(name)
        .bind(password_hash)
        .bind(now)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DbError::Conflict {
                    resource: "user",
                    id: email.as_str().to_owned(),
                }
            } else {
                DbError::Sqlx(e)
            }
        })?;

        Ok(row.into())
    }

    pub async fn find_by_email(&self, email: &Email) -> Result<Option<User>, DbError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, password_hash, created_at, updated_at
            FROM users WHERE email = ?1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    pub async fn get(&self, id: &str) -> Result<User, DbError> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, password_hash, created_at, updated_at
            FROM users WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .map(User::from)
        .ok_or_else(|| DbError::NotFound {
            resource: "user",
            id: id.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, migrations};

    async fn test_pool() -> SqlitePool {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        migrations::run(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn create_and_find() {
        let pool = test_pool().await;
        let repo = UserRepo::new(&pool);
        let email = Email::new("logan@xavier.edu").unwrap();

        let user = repo.create(&email, "Logan", "$argon2id$fake").await.unwrap();
        assert_eq!(user.email, "logan@xavier.edu");

        let found = repo.find_by_email(&email).await.unwrap().unwrap();
        assert_eq!(found.id, user.id);

        let by_id = repo.get(&user.id).await.unwrap();
        assert_eq!(by_id.name, "Logan");
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let pool = test_pool().await;
        let repo = UserRepo::new(&pool);
        let email = Email::new("scott@xavier.edu").unwrap();

        repo.create(&email, "Scott", "h1").await.unwrap();
        let err = repo.create(&email, "Scott again", "h2").await.unwrap_err();
        assert!(matches!(err, DbError::Conflict { resource: "user", .. }));
    }

    #[tokio::test]
    async fn unknown_email_is_none() {
        let pool = test_pool().await;
        let email = Email::new("nobody@nowhere.io").unwrap();
        assert!(UserRepo::new(&pool).find_by_email(&email).await.unwrap().is_none());
    }
}
