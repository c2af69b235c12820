//! Server-rendered pages: login, signup, logout and the dashboard
//!
//! Every dashboard route redirects to `/auth/login` when there is no session.

use std::sync::Arc;

use axum::{
    extract::{Form, State},
    http::{header::SET_COOKIE, StatusCode},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use crate::auth::{cookie, AuthError, SessionUser, SignedIn};
use crate::db::repos::SuperheroRepo;
use crate::http::error::ApiError;
use crate::http::extractors::{MaybeSession, SessionToken, UserAgent};
use crate::http::server::AppState;
use crate::models::HeroName;
use crate::templates::{
    render, ClientSideTemplate, DashboardTemplate, HeroView, LoginTemplate, SignupTemplate,
};

const LOGIN_PATH: &str = "/auth/login";
const DASHBOARD_PATH: &str = "/dashboard";

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Deserialize)]
pub struct HeroForm {
    #[serde(default)]
    pub name: String,
}

/// Set the session cookie and send the browser to the dashboard
fn enter_dashboard(state: &AppState, signed: SignedIn) -> Response {
    let settings = state.auth.settings();
    let set_cookie = cookie::session_cookie(
        &signed.token,
        settings.session_ttl.num_seconds(),
        settings.secure_cookies,
    );
    (
        AppendHeaders([(SET_COOKIE, set_cookie)]),
        Redirect::to(DASHBOARD_PATH),
    )
        .into_response()
}

/// Status and message for a failed form submission, or the error to propagate
fn form_failure(err: AuthError) -> Result<(StatusCode, String), ApiError> {
    match err {
        AuthError::InvalidCredentials => {
            Ok((StatusCode::UNAUTHORIZED, "Invalid email or password".to_string()))
        }
        AuthError::Validation(v) => Ok((StatusCode::BAD_REQUEST, v.to_string())),
        AuthError::EmailTaken => Ok((StatusCode::CONFLICT, AuthError::EmailTaken.to_string())),
        other => Err(other.into()),
    }
}

/// GET /auth/login
async fn login_page(MaybeSession(user): MaybeSession) -> Result<Response, ApiError> {
    if user.is_some() {
        return Ok(Redirect::to(DASHBOARD_PATH).into_response());
    }

    let page = LoginTemplate {
        email: String::new(),
        error: None,
    };
    Ok(render(&page)?.into_response())
}

/// POST /auth/login
async fn login_submit(
    State(state): State<Arc<AppState>>,
    UserAgent(ua): UserAgent,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    match state
        .auth
        .sign_in(&form.email, &form.password, ua.as_deref())
        .await
    {
        Ok(signed) => Ok(enter_dashboard(&state, signed)),
        Err(e) => {
            let (status, message) = form_failure(e)?;
            let page = LoginTemplate {
                email: form.email,
                error: Some(message),
            };
            Ok((status, render(&page)?).into_response())
        }
    }
}

/// GET /auth/signup
async fn signup_page(MaybeSession(user): MaybeSession) -> Result<Response, ApiError> {
    if user.is_some() {
        return Ok(Redirect::to(DASHBOARD_PATH).into_response());
    }

    let page = SignupTemplate {
        email: String::new(),
        name: String::new(),
        error: None,
    };
    Ok(render(&page)?.into_response())
}

/// POST /auth/signup
async fn signup_submit(
    State(state): State<Arc<AppState>>,
    UserAgent(ua): UserAgent,
    Form(form): Form<SignupForm>,
) -> Result<Response, ApiError> {
    match state
        .auth
        .sign_up(&form.email, &form.name, &form.password, ua.as_deref())
        .await
    {
        Ok(signed) => Ok(enter_dashboard(&state, signed)),
        Err(e) => {
            let (status, message) = form_failure(e)?;
            let page = SignupTemplate {
                email: form.email,
                name: form.name,
                error: Some(message),
            };
            Ok((status, render(&page)?).into_response())
        }
    }
}

/// POST /auth/logout
async fn logout(
    State(state): State<Arc<AppState>>,
    SessionToken(token): SessionToken,
) -> Result<Response, ApiError> {
    if let Some(token) = token {
        state.auth.sign_out(&token).await?;
    }

    let clear = cookie::clear_cookie(state.auth.settings().secure_cookies);
    Ok((AppendHeaders([(SET_COOKIE, clear)]), Redirect::to(LOGIN_PATH)).into_response())
}

async fn dashboard_page(
    state: &AppState,
    user: SessionUser,
    error: Option<String>,
) -> Result<DashboardTemplate, ApiError> {
    let heroes = SuperheroRepo::new(&state.pool).list().await?;
    Ok(DashboardTemplate {
        user_email: user.email,
        heroes: heroes.into_iter().map(HeroView::from).collect(),
        error,
    })
}

/// GET /dashboard - server-side fetched list
async fn dashboard(
    State(state): State<Arc<AppState>>,
    MaybeSession(user): MaybeSession,
) -> Result<Response, ApiError> {
    let Some(user) = user else {
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    };

    let page = dashboard_page(&state, user, None).await?;
    Ok(render(&page)?.into_response())
}

/// POST /dashboard/super-heroes - form create, then re-render via redirect
async fn dashboard_create(
    State(state): State<Arc<AppState>>,
    MaybeSession(user): MaybeSession,
    Form(form): Form<HeroForm>,
) -> Result<Response, ApiError> {
    let Some(user) = user else {
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    };

    match HeroName::new(&form.name) {
        Ok(name) => {
            let hero = SuperheroRepo::new(&state.pool).create(name).await?;
            tracing::info!(id = hero.id, user_id = %user.user_id, "superhero added from dashboard");
            Ok(Redirect::to(DASHBOARD_PATH).into_response())
        }
        Err(e) => {
            let page = dashboard_page(&state, user, Some(e.to_string())).await?;
            Ok((StatusCode::BAD_REQUEST, render(&page)?).into_response())
        }
    }
}

/// GET /dashboard/client-side - list is fetched by the browser
async fn dashboard_client_side(MaybeSession(user): MaybeSession) -> Result<Response, ApiError> {
    let Some(user) = user else {
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    };

    let page = ClientSideTemplate {
        user_email: user.email,
    };
    Ok(render(&page)?.into_response())
}

/// Page routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login", get(login_page).post(login_submit))
        .route("/auth/signup", get(signup_page).post(signup_submit))
        .route("/auth/logout", post(logout))
        .route("/dashboard", get(dashboard))
        .route("/dashboard/super-heroes", post(dashboard_create))
        .route("/dashboard/client-side", get(dashboard_client_side))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::testing::{body_text, session_cookie_from, sign_up_cookie, test_app};

    fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(c) = cookie {
            builder = builder.header("cookie", c);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn form_post(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/x-www-form-urlencoded");
        if let Some(c) = cookie {
            builder = builder.header("cookie", c);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn location(response: &axum::response::Response) -> &str {
        response.headers()["location"].to_str().unwrap()
    }

    #[tokio::test]
    async fn dashboard_without_session_redirects_to_login() {
        let (app, _) = test_app().await;

        for uri in ["/dashboard", "/dashboard/client-side"] {
            let response = app.clone().oneshot(get(uri, None)).await.unwrap();
            assert!(response.status().is_redirection(), "{uri}");
            assert_eq!(location(&response), "/auth/login");
        }
    }

    #[tokio::test]
    async fn dashboard_with_bogus_cookie_redirects() {
        let (app, _) = test_app().await;

        let response = app
            .oneshot(get("/dashboard", Some("superheroes.session_token=forged")))
            .await
            .unwrap();
        assert!(response.status().is_redirection());
        assert_eq!(location(&response), "/auth/login");
    }

    #[tokio::test]
    async fn dashboard_greets_signed_in_user() {
        let (app, _) = test_app().await;
        let cookie = sign_up_cookie(&app, "natasha@shield.gov", "red-ledger-1").await;

        let response = app.oneshot(get("/dashboard", Some(&cookie))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("Hi natasha@shield.gov"));
        assert!(html.contains("No superheroes found. Add your first one!"));
    }

    #[tokio::test]
    async fn form_create_then_listed_on_dashboard() {
        let (app, _) = test_app().await;
        let cookie = sign_up_cookie(&app, "steve@shield.gov", "on-your-left").await;

        let response = app
            .clone()
            .oneshot(form_post(
                "/dashboard/super-heroes",
                "name=Captain+Marvel",
                Some(&cookie),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/dashboard");

        let response = app.oneshot(get("/dashboard", Some(&cookie))).await.unwrap();
        let html = body_text(response).await;
        assert!(html.contains("Captain Marvel"));
        assert!(html.contains("Added on"));
    }

    #[tokio::test]
    async fn form_create_blank_name_rerenders_with_error() {
        let (app, _) = test_app().await;
        let cookie = sign_up_cookie(&app, "hope@pym.tech", "wasp-wings-1").await;

        let response = app
            .oneshot(form_post("/dashboard/super-heroes", "name=+++", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("Name is required"));
    }

    #[tokio::test]
    async fn form_create_without_session_redirects() {
        let (app, _) = test_app().await;

        let response = app
            .oneshot(form_post("/dashboard/super-heroes", "name=Nobody", None))
            .await
            .unwrap();
        assert!(response.status().is_redirection());
        assert_eq!(location(&response), "/auth/login");
    }

    #[tokio::test]
    async fn form_login_sets_cookie_and_redirects() {
        let (app, _) = test_app().await;
        sign_up_cookie(&app, "scott@lang.io", "ant-sized-1").await;

        let response = app
            .clone()
            .oneshot(form_post(
                "/auth/login",
                "email=scott%40lang.io&password=ant-sized-1",
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/dashboard");
        let cookie = session_cookie_from(&response).expect("cookie");

        let response = app.oneshot(get("/dashboard", Some(&cookie))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn form_login_failure_rerenders() {
        let (app, _) = test_app().await;

        let response = app
            .oneshot(form_post(
                "/auth/login",
                "email=nobody%40x.io&password=whatever123",
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body_text(response).await.contains("Invalid email or password"));
    }

    #[tokio::test]
    async fn form_signup_creates_account() {
        let (app, _) = test_app().await;

        let response = app
            .clone()
            .oneshot(form_post(
                "/auth/signup",
                "name=Jessica&email=jessica%40alias.inv&password=alias-investigations",
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let cookie = session_cookie_from(&response).expect("cookie");

        let response = app
            .oneshot(get("/dashboard/client-side", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Hi jessica@alias.inv"));
        assert!(html.contains("fetch(\"/super-heroes\""));
    }

    #[tokio::test]
    async fn logout_ends_session() {
        let (app, _) = test_app().await;
        let cookie = sign_up_cookie(&app, "luke@cage.nyc", "unbreakable-1").await;

        let response = app
            .clone()
            .oneshot(form_post("/auth/logout", "", Some(&cookie)))
            .await
            .unwrap();
        assert!(response.status().is_redirection());
        assert_eq!(location(&response), "/auth/login");

        let response = app.oneshot(get("/dashboard", Some(&cookie))).await.unwrap();
        assert!(response.status().is_redirection());
    }

    #[tokio::test]
    async fn login_page_redirects_when_signed_in() {
        let (app, _) = test_app().await;
        let cookie = sign_up_cookie(&app, "danny@rand.co", "iron-fist-1").await;

        let response = app.oneshot(get("/auth/login", Some(&cookie))).await.unwrap();
        assert!(response.status().is_redirection());
        assert_eq!(location(&response), "/dashboard");
    }
}
