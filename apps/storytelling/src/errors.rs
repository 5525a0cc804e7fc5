use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Generation failures never show up here: they are absorbed by the
/// generator and answered with the fallback narrative.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid field '{field}': {message}")]
    InvalidField { field: String, message: String },
}

impl AppError {
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::InvalidField { field, message } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "error": {
                        "code": "VALIDATION_ERROR",
                        "message": message,
                        "fields": [field]
                    }
                }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
