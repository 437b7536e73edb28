pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;

use std::sync::Arc;

use axum::routing::get;
use axum::{middleware, Router};
use tower_http::trace::TraceLayer;

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

/// Build the application router. Every request passes through the context
/// middleware, which resolves the session user and owns the per-request
/// database connection.
pub fn app(config: Config) -> Router {
    let state = AppState {
        config: Arc::new(config),
    };
    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .merge(routes::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            context::request_context,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
