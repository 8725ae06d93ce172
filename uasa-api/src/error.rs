//! Error types for uasa-api
//!
//! Errors are returned as `text/plain` bodies carrying a human-readable
//! message, matching what existing clients of the roster API display.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;
use uasa_common::Error as StoreError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed request field (400)
    #[error("{0}")]
    BadRequest(String),

    /// Class not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Class name already taken (409)
    #[error("{0}")]
    Conflict(String),

    /// Request rejected by the HTTP layer with its own status (e.g. 413)
    #[error("{1}")]
    Rejected(StatusCode, String),

    /// Internal server error (500)
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Map a store error using operation-specific messages
    ///
    /// `not_found` replaces the message for `NotFound`; every other failure
    /// becomes `failure_prefix` followed by the underlying cause.
    pub fn from_store(err: StoreError, not_found: &str, failure_prefix: &str) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound(not_found.to_string()),
            StoreError::Conflict(msg) => ApiError::Conflict(msg),
            other => {
                error!("{}{}", failure_prefix, other);
                ApiError::Internal(format!("{}{}", failure_prefix, other))
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Rejected(status, _) => *status,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_map_to_status_codes() {
        let cases = [
            (StoreError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (StoreError::Conflict("x".into()), StatusCode::CONFLICT),
            (StoreError::Read("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                StoreError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from_store(err, "-", "Ralat: ").status(), expected);
        }
    }

    #[test]
    fn test_from_store_uses_operation_messages() {
        let err = ApiError::from_store(
            StoreError::NotFound("class 'x'".into()),
            "Kelas tidak ditemui.",
            "Ralat: ",
        );
        assert_eq!(err.to_string(), "Kelas tidak ditemui.");

        let err = ApiError::from_store(StoreError::Read("bad".into()), "-", "Ralat: ");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().starts_with("Ralat: "));
        assert!(err.to_string().contains("bad"));
    }
}
