use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Server-side failure surfaced to the client as a bare 500.
///
/// Recoverable outcomes (validation, duplicate username, bad credentials)
/// never reach this type; they are handled at the view boundary as flash
/// messages. Anything that lands here is an operational fault, e.g. the
/// database file cannot be opened.
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = format!("{:#}", self.0), "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        AppError(err.into())
    }
}
