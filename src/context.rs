//! Per-request context: the one database connection and the resolved user.
//!
//! There are no ambient globals; the middleware builds a [`RequestContext`]
//! for every request and threads it through the router as an extension. The
//! context opens its SQLite connection lazily on first use, hands the same
//! connection to every caller within the request, and the middleware closes
//! it when the response is ready, whatever the outcome was.

use std::sync::{Arc, OnceLock};

use axum::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use sqlx::sqlite::SqliteConnection;
use sqlx::ConnectOptions;
use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};

use crate::config::Config;
use crate::db;
use crate::error::AppError;
use crate::models::User;
use crate::session;
use crate::AppState;

#[derive(Clone)]
pub struct RequestContext {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    config: Arc<Config>,
    // The mutex only makes the lazily opened connection shareable through the
    // extension; within one request access is strictly sequential.
    conn: Mutex<Option<SqliteConnection>>,
    // Resolved at most once per request, before dispatch.
    user: OnceLock<Option<User>>,
}

impl RequestContext {
    pub fn new(config: Arc<Config>) -> Self {
        RequestContext {
            inner: Arc::new(ContextInner {
                config,
                conn: Mutex::new(None),
                user: OnceLock::new(),
            }),
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// The request's database connection, opened on first call and reused by
    /// every later call in the same request.
    pub async fn db(&self) -> Result<MappedMutexGuard<'_, SqliteConnection>, sqlx::Error> {
        let mut guard = self.inner.conn.lock().await;
        if guard.is_none() {
            let conn = db::connect_options(&self.inner.config.database)
                .connect()
                .await?;
            *guard = Some(conn);
        }
        Ok(MutexGuard::map(guard, |slot| {
            slot.as_mut().expect("connection opened above")
        }))
    }

    /// Close the connection if one was ever opened. Safe to call repeatedly;
    /// with nothing open it is a no-op.
    pub async fn close(&self) -> Result<(), sqlx::Error> {
        let conn = { self.inner.conn.lock().await.take() };
        if let Some(conn) = conn {
            sqlx::Connection::close(conn).await?;
        }
        Ok(())
    }

    /// The user resolved by the identity loader, if the session named a live
    /// account.
    pub fn user(&self) -> Option<&User> {
        self.inner.user.get().and_then(|user| user.as_ref())
    }

    fn set_user(&self, user: Option<User>) {
        let _ = self.inner.user.set(user);
    }
}

/// Middleware wrapping every route: builds the context, resolves the session
/// user before the view runs, and closes the connection after the response
/// is produced, on the error path included.
pub async fn request_context(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let ctx = RequestContext::new(state.config.clone());
    let session_user =
        session::user_id_from_headers(req.headers(), state.config.secret_key.as_bytes());

    let response = match load_current_user(&ctx, session_user).await {
        Ok(()) => {
            req.extensions_mut().insert(ctx.clone());
            next.run(req).await
        }
        // Cannot reach the database at all: fatal to this request.
        Err(err) => AppError::from(err).into_response(),
    };

    if let Err(err) = ctx.close().await {
        tracing::warn!(error = %err, "failed to close request connection");
    }
    response
}

/// Resolve the session's user id to a row, caching the outcome in the
/// context. No session or a stale id leaves the request anonymous; only a
/// connection-level failure is an error.
async fn load_current_user(
    ctx: &RequestContext,
    session_user: Option<i64>,
) -> Result<(), sqlx::Error> {
    let user = match session_user {
        None => None,
        Some(id) => {
            let mut db = ctx.db().await?;
            sqlx::query_as::<_, User>("SELECT * FROM user WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *db)
                .await?
        }
    };
    ctx.set_user(user);
    Ok(())
}

/// Extractor guarding logged-in-only views. It only inspects what the
/// identity loader already cached; anonymous requests are redirected to the
/// login form without touching the database.
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .and_then(|ctx| ctx.user().cloned())
            .map(CurrentUser)
            .ok_or_else(|| Redirect::to("/auth/login"))
    }
}
