//! Centralized error types for Tandem.
//!
//! Uses `thiserror` for ergonomic error definitions and provides HTTP-friendly
//! error variants that can be directly converted to API responses.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Core application error type used across all Tandem services.
#[derive(Debug, thiserror::Error)]
pub enum TandemError {
    // === Validation errors ===
    #[error("{message}")]
    Validation { message: String },

    // === Join gate ===
    #[error("Incorrect password")]
    Unauthorized,

    // === Capacity ===
    #[error("Limit reached: {message}")]
    LimitReached { message: String },

    // === Infrastructure errors ===
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body sent to clients.
#[derive(Serialize)]
struct ErrorResponse {
    code: u16,
    error: String,
    message: String,
}

impl TandemError {
    /// Shorthand for a validation failure with a fixed message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Map error to HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::LimitReached { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Redis(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Error code string for programmatic handling by clients.
    pub fn error_code(&self) -> &str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::LimitReached { .. } => "LIMIT_REACHED",
            Self::Redis(_) => "CACHE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<JsonRejection> for TandemError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(format!("Invalid request: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for TandemError {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation(format!("Invalid query: {}", rejection.body_text()))
    }
}

impl IntoResponse for TandemError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Don't leak internal details to clients
        let message = match &self {
            TandemError::Redis(e) => {
                tracing::error!("Redis error: {e}");
                "An internal error occurred".to_string()
            }
            TandemError::Internal(e) => {
                tracing::error!("Internal error: {e}");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorResponse {
            code: status.as_u16(),
            error: self.error_code().to_string(),
            message,
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Convenience type alias for Results using TandemError.
pub type TandemResult<T> = Result<T, TandemError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let err = TandemError::validation("from/signal required");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert_eq!(err.to_string(), "from/signal required");
    }

    #[test]
    fn internal_errors_are_server_errors() {
        let err = TandemError::Internal(anyhow::anyhow!("boom"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
