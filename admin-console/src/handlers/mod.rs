pub mod app;
pub mod auth;
pub mod chat;
pub mod metrics;
pub mod users;

use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use console_core::AppError;

/// Render a template as an HTML response, falling back to a 500 if rendering fails.
pub(crate) fn render<T: Template>(status: StatusCode, template: &T) -> Response {
    match template.render() {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => AppError::Internal(anyhow::anyhow!(
            "Failed to render {}: {}",
            std::any::type_name::<T>(),
            e
        ))
        .into_response(),
    }
}

/// Status for a fragment whose data came from `result`.
pub(crate) fn status_of<T>(result: &Result<T, AppError>) -> StatusCode {
    result
        .as_ref()
        .err()
        .map(AppError::status_code)
        .unwrap_or(StatusCode::OK)
}
