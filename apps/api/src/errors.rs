use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::advisor::runtime::AgentError;
use crate::livekit::TokenError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every response body has the shape `{"detail": "..."}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Upstream agent error: {0}")]
    Upstream(String),

    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error(transparent)]
    Body(#[from] JsonRejection),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Agent(e) => {
                tracing::error!("Advisor invocation failed: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AppError::Token(e) => {
                tracing::error!("Token issuance failed: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            AppError::Upstream(msg) => {
                tracing::error!("Upstream agent error: {msg}");
                (StatusCode::BAD_GATEWAY, msg.clone())
            }
            AppError::NotConfigured(_) => (StatusCode::NOT_IMPLEMENTED, self.to_string()),
            AppError::Body(rejection) => (rejection.status(), rejection.body_text()),
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
