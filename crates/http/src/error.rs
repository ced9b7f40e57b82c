//! Error handling for the Shelf HTTP layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error envelope returned for every failed request: `{"error": "..."}`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("bad request: {message}")]
    BadRequest { message: String },

    #[error("not found: {message}")]
    NotFound { message: String },

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match self {
            AppError::BadRequest { message } | AppError::NotFound { message } => {
                tracing::warn!(status_code = %status.as_u16(), %message, "request rejected");
                message
            }
            AppError::MethodNotAllowed => {
                tracing::warn!(status_code = %status.as_u16(), "method not allowed");
                "method not allowed".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!(status_code = %status.as_u16(), error = ?e, "request failed");
                // Release builds hide internal details from clients.
                if cfg!(debug_assertions) {
                    e.to_string()
                } else {
                    "internal server error".to_string()
                }
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Handler for method mismatches on known paths.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Handler for paths no route matched.
pub async fn not_found() -> AppError {
    AppError::not_found("not found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(error: AppError) -> (StatusCode, ErrorBody) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_bad_request_envelope() {
        let (status, body) = body_of(AppError::bad_request("invalid book id")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "invalid book id");
    }

    #[tokio::test]
    async fn test_not_found_envelope() {
        let (status, body) = body_of(AppError::not_found("book not found")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "book not found");
    }

    #[tokio::test]
    async fn test_method_not_allowed_envelope() {
        let (status, body) = body_of(method_not_allowed().await).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body.error, "method not allowed");
    }

    #[tokio::test]
    async fn test_internal_error_mapping() {
        let internal_error = anyhow::anyhow!("lock poisoned");
        let (status, body) = body_of(AppError::Internal(internal_error)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.error.is_empty());
    }
}
