//! HTTP client for the superheroes API
//!
//! Used by `superheroes heroes ...` to talk to a running server the same way
//! any other frontend would.

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Superhero as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Superhero {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Api { status: StatusCode, message: String },
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

pub struct HeroesClient {
    http: reqwest::Client,
    base_url: String,
}

impl HeroesClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET /super-heroes
    pub async fn list(&self) -> Result<Vec<Superhero>, ClientError> {
        let response = self.http.get(self.url("/super-heroes")).send().await?;
        Self::decode(response).await
    }

    /// POST /super-heroes
    pub async fn create(&self, name: &str) -> Result<Superhero, ClientError> {
        let response = self
            .http
            .post(self.url("/super-heroes"))
            .json(&json!({ "name": name }))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|b| b.error)
            .unwrap_or(text);
        Err(ClientError::Api { status, message })
    }
}
