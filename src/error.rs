//! Service error types with HTTP status code mapping.
//!
//! [`ServiceError`] is the central error type for the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses except [`ServiceError::InvalidIpAddress`] (a bare
/// JSON string) follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 3001,
///     "message": "store unavailable"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category   | HTTP Status               |
/// |-----------|------------|---------------------------|
/// | 1000–1999 | Validation | 400 Bad Request           |
/// | 3000–3999 | Server     | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The supplied IP address is not valid IPv4 or IPv6 text.
    #[error("Invalid IP address")]
    InvalidIpAddress,

    /// A value violated a storage constraint (e.g. column length).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The relational store could not be reached or rejected the query.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidIpAddress => 1001,
            Self::Validation(_) => 1002,
            Self::Internal(_) => 3000,
            Self::StoreUnavailable(_) => 3001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidIpAddress | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::StoreUnavailable(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message exposed to clients. Server-side details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            Self::StoreUnavailable(_) => "store unavailable".to_string(),
            Self::Internal(_) => "internal error".to_string(),
            Self::InvalidIpAddress | Self::Validation(_) => self.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Bare JSON string, no envelope.
        if matches!(self, Self::InvalidIpAddress) {
            return (status, axum::Json(self.to_string())).into_response();
        }
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.public_message(),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
