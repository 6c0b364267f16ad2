use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Message surfaced when an operation needs a bearer token and none is present.
pub const AUTH_REQUIRED_MESSAGE: &str = "Access token is required";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Access token is required")]
    AuthRequired,

    #[error("Network error: {0}")]
    Network(String),

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Configuration error: {0}")]
    Config(anyhow::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(anyhow::Error::new(err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Network(err.to_string())
    }
}

impl AppError {
    /// HTTP status used when this error is rendered to the presentation layer.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::AuthRequired => StatusCode::UNAUTHORIZED,
            AppError::Network(_) => StatusCode::BAD_GATEWAY,
            AppError::Server { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the user. Internal details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(_) | AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            details: Option<String>,
        }

        let status = self.status_code();
        let details = match &self {
            AppError::Validation(err) => Some(err.to_string()),
            AppError::Config(err) | AppError::Internal(err) => {
                tracing::error!(error = ?err, "Request failed");
                None
            }
            _ => None,
        };

        (
            status,
            Json(ErrorResponse {
                error: self.user_message(),
                details,
            }),
        )
            .into_response()
    }
}
