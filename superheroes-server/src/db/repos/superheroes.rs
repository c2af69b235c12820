//! Superhero repository
//!
//! - list: every row, oldest id first
//! - create: INSERT ... RETURNING so the caller gets generated id and timestamps

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use super::DbError;
use crate::db::{from_ts, now_ts};
use crate::models::HeroName;

/// Superhero record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Superhero {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw row; timestamps are stored as unix seconds
#[derive(FromRow)]
struct SuperheroRow {
    id: i64,
    name: String,
    created_at: i64,
    updated_at: i64,
}

impl From<SuperheroRow> for Superhero {
    fn from(r: SuperheroRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            created_at: from_ts(r.created_at),
            updated_at: from_ts(r.updated_at),
        }
    }
}

/// Superhero repository
pub struct SuperheroRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SuperheroRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all superheroes ordered by id.
    pub async fn list(&self) -> Result<Vec<Superhero>, DbError> {
        let rows = sqlx::query_as::<_, SuperheroRow>(
            "SELECT id, name, created_at, updated_at FROM superheroes ORDER BY id ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Superhero::from).collect())
    }

    /// Insert a superhero and return the stored record.
    pub async fn create(&self, name: HeroName) -> Result<Superhero, DbError> {
        let now = now_ts();
        let row = sqlx::query_as::<_, SuperheroRow>(
            r#"
            INSERT INTO superheroes (name, created_at, updated_at)
            VALUES (?1, ?2, ?2)
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(name.as_str())
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        tracing::debug!(id = row.id, name = %row.name, "superhero created");
        Ok(row.into())
    }

    /// Get a single superhero by id.
    pub async fn get(&self, id: i64) -> Result<Superhero, DbError> {
        sqlx::query_as::<_, SuperheroRow>(
            "SELECT id, name, created_at, updated_at FROM superheroes WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .map(Superhero::from)
        .ok_or_else(|| DbError::NotFound {
            resource: "superhero",
            id: id.to_string(),
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
    async fn create_then_list() {
        let pool = test_pool().await;
        let repo = SuperheroRepo::new(&pool);

        assert!(repo.list().await.unwrap().is_empty());

        let hero = repo.create(HeroName::new("Storm").unwrap()).await.unwrap();
        assert_eq!(hero.name, "Storm");
        assert_eq!(hero.created_at, hero.updated_at);

        let all = repo.list().await.unwrap();
        assert_eq!(all, vec![hero]);
    }

    #[tokio::test]
    async fn ids_increase() {
        let pool = test_pool().await;
        let repo = SuperheroRepo::new(&pool);

        let a = repo.create(HeroName::new("Cyclops").unwrap()).await.unwrap();
        let b = repo.create(HeroName::new("Jean Grey").unwrap()).await.unwrap();
        let c = repo.create(HeroName::new("Beast").unwrap()).await.unwrap();

        assert!(a.id < b.id && b.id < c.id);

        let names: Vec<_> = repo.list().await.unwrap().into_iter().map(|h| h.name).collect();
        assert_eq!(names, vec!["Cyclops", "Jean Grey", "Beast"]);
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let pool = test_pool().await;
        let err = SuperheroRepo::new(&pool).get(42).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { resource: "superhero", .. }));
    }

    #[tokio::test]
    async fn get_returns_created_row() {
        let pool = test_pool().await;
        let repo = SuperheroRepo::new(&pool);
        let hero = repo.create(HeroName::new("Rogue").unwrap()).await.unwrap();

        assert_eq!(repo.get(hero.id).await.unwrap(), hero);
    }
}
