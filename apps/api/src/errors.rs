use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad or missing input: empty upload, unreadable résumé, nothing to evaluate.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation invoked in the wrong interview phase.
    #[error("State error: {0}")]
    State(String),

    /// A collaborator call failed, timed out, or returned output that could not be used.
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::State(_) => (StatusCode::CONFLICT, "STATE_ERROR"),
            AppError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let detail = match &self {
            AppError::Validation(msg) | AppError::State(msg) => msg.clone(),
            AppError::Upstream(msg) => {
                tracing::error!("Upstream error: {msg}");
                msg.clone()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
        };

        let body = Json(json!({
            "detail": detail,
            "code": code
        }));

        (status, body).into_response()
    }
}
