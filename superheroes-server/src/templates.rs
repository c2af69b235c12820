//! HTML page templates (askama, files under `templates/`)

use askama::Template;
use axum::response::Html;

use crate::db::repos::Superhero;
use crate::http::ApiError;

/// One row of the server-rendered hero list
pub struct HeroView {
    pub id: i64,
    pub name: String,
    pub added_on: String,
}

impl From<Superhero> for HeroView {
    fn from(h: Superhero) -> Self {
        Self {
            id: h.id,
            name: h.name,
            added_on: h.created_at.format("%b %-d, %Y").to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub email: String,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "signup.html")]
pub struct SignupTemplate {
    pub email: String,
    pub name: String,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub user_email: String,
    pub heroes: Vec<HeroView>,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "client_side.html")]
pub struct ClientSideTemplate {
    pub user_email: String,
}

/// Render a template, turning askama failures into a 500
pub fn render<T: Template>(template: &T) -> Result<Html<String>, ApiError> {
    template.render().map(Html).map_err(|e| ApiError::Internal {
        message: format!("template rendering failed: {}", e),
    })
}
