//! Error types for the registration service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Service error types.
///
/// Every variant is terminal for the request and maps to a client-facing
/// JSON error body. None of them affect the process.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),
}

impl ServiceError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

impl From<axum::extract::rejection::JsonRejection> for ServiceError {
    fn from(e: axum::extract::rejection::JsonRejection) -> Self {
        ServiceError::InvalidInput(format!("Invalid request body: {}", e.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ServiceError::RateLimited.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ServiceError::InvalidInput("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::NotFound("missing".into()).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(ServiceError::RateLimited.to_string(), "Rate limit exceeded");
        assert_eq!(
            ServiceError::NotFound("Registration not found".into()).to_string(),
            "Registration not found"
        );
    }
}
