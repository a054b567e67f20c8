use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::advice::encoder::UnknownLabelError;
use crate::auth::validation::FieldErrors;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Per-field form errors from signup/login, including bad credentials.
    #[error("Form rejected: {0:?}")]
    FieldErrors(FieldErrors),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Chat request has neither a message nor skills")]
    MissingInput,

    #[error(transparent)]
    UnknownLabel(#[from] UnknownLabelError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Shorthand for a single-field form error.
    pub fn field(field: &'static str, message: &str) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field, message.to_string());
        AppError::FieldErrors(errors)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // Form endpoints keep the `{success, errors}` shape the sign-in pages expect.
            AppError::FieldErrors(errors) => {
                let body = Json(json!({
                    "success": false,
                    "errors": errors,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::MissingInput => (
                StatusCode::BAD_REQUEST,
                "MISSING_INPUT",
                "Provide a message or a skills assessment".to_string(),
            ),
            AppError::UnknownLabel(e) => (StatusCode::BAD_REQUEST, "UNKNOWN_LABEL", e.to_string()),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
