//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use domain_claims::ClaimError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    NotFound { message: String, code: &'static str },

    #[error("{message}")]
    BadRequest { error: String, message: String },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(error: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            error: error.into(),
            message: message.into(),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message, code) = match self {
            ApiError::NotFound { message, code } => (
                StatusCode::NOT_FOUND,
                "not_found".to_string(),
                message,
                Some(code.to_string()),
            ),
            ApiError::BadRequest { error, message } => {
                (StatusCode::BAD_REQUEST, error, message, None)
            }
            ApiError::Validation(message) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error".to_string(),
                message,
                None,
            ),
            ApiError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error".to_string(),
                message,
                None,
            ),
        };

        let body = ErrorResponse {
            error: error_type,
            message,
            code,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ClaimError> for ApiError {
    fn from(err: ClaimError) -> Self {
        match err {
            ClaimError::NotFound(_) => ApiError::NotFound {
                code: err.code(),
                message: err.to_string(),
            },
            ClaimError::Validation(_) => ApiError::Validation(err.to_string()),
            ClaimError::Store(e) => {
                error!(error = %e, "Claims store failure");
                ApiError::Internal(e.to_string())
            }
        }
    }
}
