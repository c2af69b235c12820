//! Superhero endpoints

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::db::repos::{Superhero, SuperheroRepo};
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::HeroName;

/// Create superhero request. `name` is optional so a missing field gets the
/// same "Name is required" answer as an empty one.
#[derive(Deserialize)]
pub struct CreateSuperheroRequest {
    pub name: Option<String>,
}

/// Superhero response
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SuperheroResponse {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Superhero> for SuperheroResponse {
    fn from(h: Superhero) -> Self {
        Self {
            id: h.id,
            name: h.name,
            created_at: h.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            updated_at: h.updated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// GET /super-heroes - list every superhero
async fn list_superheroes(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SuperheroResponse>>, ApiError> {
    let heroes = SuperheroRepo::new(&state.pool).list().await?;
    Ok(Json(heroes.into_iter().map(SuperheroResponse::from).collect()))
}

/// POST /super-heroes - create a superhero
async fn create_superhero(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateSuperheroRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SuperheroResponse>), ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest {
        message: e.body_text(),
    })?;

    let name = HeroName::new(req.name.as_deref().unwrap_or_default())?;
    let hero = SuperheroRepo::new(&state.pool).create(name).await?;
    tracing::info!(id = hero.id, "superhero added");

    Ok((StatusCode::CREATED, Json(SuperheroResponse::from(hero))))
}

/// GET /super-heroes/{id} - get a single superhero
async fn get_superhero(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<SuperheroResponse>, ApiError> {
    let Path(id) = id.map_err(|e| ApiError::BadRequest {
        message: e.body_text(),
    })?;

    let hero = SuperheroRepo::new(&state.pool).get(id).await?;
    Ok(Json(SuperheroResponse::from(hero)))
}

/// Superhero routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/super-heroes", get(list_superheroes).post(create_superhero))
        .route("/super-heroes/{id}", get(get_superhero))
}
