//! Custom error types for the API service

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use common::error::CoreError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or rejected credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(&'static str),

    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Store or token failure
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Core(CoreError::NotFound) => {
                (StatusCode::NOT_FOUND, "item not found".to_string())
            }
            ApiError::Core(CoreError::Conflict) => {
                (StatusCode::CONFLICT, "resource already exists".to_string())
            }
            ApiError::Core(CoreError::InvalidToken | CoreError::ExpiredToken) => (
                StatusCode::UNAUTHORIZED,
                "invalid or expired token".to_string(),
            ),
            ApiError::Core(CoreError::Unavailable(detail)) => {
                error!("Backend unavailable: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        let mut response = (status, body).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
