//! Registration, login and logout handlers.
//!
//! POST handlers re-render their form with a flash message for anything the
//! visitor can fix; storage faults bubble out as [`AppError`] and become 500s.

use axum::extract::{Extension, Form};
use axum::http::header;
use axum::response::{AppendHeaders, Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use crate::context::{CurrentUser, RequestContext};
use crate::error::AppError;
use crate::routes::pages;
use crate::services::auth_service;
use crate::session;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", get(register_form).post(register))
        .route("/auth/login", get(login_form).post(login))
        .route("/auth/logout", get(logout))
        .route("/me", get(me))
}

/// GET /auth/register
pub async fn register_form() -> Html<String> {
    Html(pages::register(None))
}

/// POST /auth/register - create the account, then send the visitor to login
pub async fn register(
    Extension(ctx): Extension<RequestContext>,
    Form(creds): Form<Credentials>,
) -> Result<Response, AppError> {
    let mut db = ctx.db().await?;
    match auth_service::register_user(&mut db, &creds.username, &creds.password).await {
        Ok(user_id) => {
            tracing::info!(user_id, username = %creds.username, "registered new user");
            Ok(Redirect::to("/auth/login").into_response())
        }
        Err(err) => match err.flash() {
            Some(message) => Ok(Html(pages::register(Some(&message))).into_response()),
            None => Err(err.into()),
        },
    }
}

/// GET /auth/login
pub async fn login_form() -> Html<String> {
    Html(pages::login(None))
}

/// POST /auth/login - verify credentials and start a session
pub async fn login(
    Extension(ctx): Extension<RequestContext>,
    Form(creds): Form<Credentials>,
) -> Result<Response, AppError> {
    let mut db = ctx.db().await?;
    match auth_service::verify_user(&mut db, &creds.username, &creds.password).await {
        Ok(user) => {
            tracing::info!(user_id = user.id, username = %user.username, "user logged in");
            let cookie = session::issue(ctx.config().secret_key.as_bytes(), user.id);
            let headers = AppendHeaders([(header::SET_COOKIE, cookie.to_string())]);
            Ok((headers, Redirect::to("/")).into_response())
        }
        Err(err) => match err.flash() {
            Some(message) => Ok(Html(pages::login(Some(&message))).into_response()),
            None => Err(err.into()),
        },
    }
}

/// GET /auth/logout - clear the session cookie
pub async fn logout() -> impl IntoResponse {
    let headers = AppendHeaders([(header::SET_COOKIE, session::removal().to_string())]);
    (headers, Redirect::to("/"))
}

/// GET /me - profile page, sign-in required
pub async fn me(CurrentUser(user): CurrentUser) -> Html<String> {
    Html(pages::profile(&user))
}
