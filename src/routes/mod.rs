use axum::extract::Extension;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;

use crate::context::RequestContext;
use crate::AppState;

pub mod auth;
pub mod pages;

async fn index(Extension(ctx): Extension<RequestContext>) -> impl IntoResponse {
    Html(pages::index(ctx.user()))
}

async fn hello() -> &'static str {
    "Hello, World!"
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/hello", get(hello))
        .merge(auth::router())
}
