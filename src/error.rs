//! Error types: the domain taxonomy and the HTTP-facing `AppError`.
//!
//! Domain code returns [`Error`]; handlers convert into [`AppError`], which
//! implements Axum's `IntoResponse`. Reconciliation failures (external payment
//! succeeded, local state update failed) are logged distinctly before being
//! surfaced — money has moved even though records have not.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

/// Result alias over the domain error.
pub type Result<T> = std::result::Result<T, Error>;

/// Domain error taxonomy.
///
/// Validation, not-found and conflict errors are detected before any mutation
/// and short-circuit the operation; dependency errors never fail the
/// triggering operation (they are logged where they occur).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bad input shape or range; no state change
    #[error("{0}")]
    Validation(String),

    /// A computed price field was not a finite number
    #[error("invalid price breakdown: {0}")]
    InvalidPrice(String),

    /// Missing room/resident/booking; no state change
    #[error("{resource} not found")]
    NotFound {
        /// Kind of the missing entity
        resource: &'static str,
        /// Identifier that failed to resolve
        id: String,
    },

    /// Overlapping booking, capacity exceeded or already-cancelled; no state change
    #[error("{0}")]
    Conflict(String),

    /// Missing or invalid credentials
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not allowed
    #[error("{0}")]
    Forbidden(String),

    /// External payment succeeded but the local state update failed
    #[error("reconciliation required: {0}")]
    Reconciliation(String),

    /// Notifier or renderer failure; logged, never rolls back the operation
    #[error("{0}")]
    Dependency(String),

    /// Payment provider call failed
    #[error("payment provider error: {0}")]
    Payment(String),

    /// Database failure
    #[error("database error: {0}")]
    Database(String),
}

impl Error {
    /// Shorthand for a not-found error.
    pub fn not_found(resource: &'static str, id: impl fmt::Display) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Application error type for web handlers.
///
/// Wraps domain errors and provides HTTP-friendly error responses; implements
/// Axum's `IntoResponse` so handlers can return `Result<_, AppError>`.
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: String,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: String) -> Self {
        Self {
            status,
            message,
            code,
            source: None,
        }
    }

    /// Create a new error with a source error.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            message.into(),
            "BAD_REQUEST".to_string(),
        )
    }

    /// Create a 401 Unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            message.into(),
            "UNAUTHORIZED".to_string(),
        )
    }

    /// Create a 403 Forbidden error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            message.into(),
            "FORBIDDEN".to_string(),
        )
    }

    /// Create a 404 Not Found error.
    #[must_use]
    pub fn not_found(resource: impl fmt::Display, id: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            format!("{resource} with id {id} not found"),
            "NOT_FOUND".to_string(),
        )
    }

    /// Create a 409 Conflict error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::CONFLICT,
            message.into(),
            "CONFLICT".to_string(),
        )
    }

    /// Create a 422 Unprocessable Entity error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            message.into(),
            "VALIDATION_ERROR".to_string(),
        )
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message.into(),
            "INTERNAL_SERVER_ERROR".to_string(),
        )
    }

    /// Create a 502 Bad Gateway error.
    #[must_use]
    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_GATEWAY,
            message.into(),
            "BAD_GATEWAY".to_string(),
        )
    }

    /// The HTTP status of this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation(msg) => Self::validation(msg),
            Error::InvalidPrice(msg) => Self::validation(format!("Invalid price breakdown: {msg}")),
            Error::NotFound { resource, id } => Self::not_found(resource, id),
            Error::Conflict(msg) => Self::conflict(msg),
            Error::Unauthorized(msg) => Self::unauthorized(msg),
            Error::Forbidden(msg) => Self::forbidden(msg),
            Error::Reconciliation(msg) => {
                tracing::error!(target: "reconciliation", error = %msg, "payment captured but local state update failed");
                Self::internal(format!("Reconciliation required: {msg}"))
            }
            Error::Dependency(msg) => {
                tracing::warn!(error = %msg, "dependency failure");
                Self::internal(msg)
            }
            Error::Payment(msg) => Self::bad_gateway(msg),
            Error::Database(msg) => {
                Self::internal("An internal error occurred").with_source(anyhow::anyhow!(msg))
            }
        }
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Error code (for client error handling).
    code: String,
    /// Human-readable error message.
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log internal errors
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    "Internal server error"
                );
            }
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal("An internal error occurred").with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::bad_request("Invalid input");
        assert_eq!(err.to_string(), "[BAD_REQUEST] Invalid input");
    }

    #[test]
    fn test_not_found() {
        let err = AppError::not_found("Booking", "123");
        assert_eq!(err.to_string(), "[NOT_FOUND] Booking with id 123 not found");
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn conflict_maps_to_409() {
        let err: AppError = Error::Conflict("Booking is already cancelled".to_string()).into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn validation_maps_to_422() {
        let err: AppError = Error::Validation("Invalid booking dates".to_string()).into();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code, "VALIDATION_ERROR");
    }

    #[test]
    fn reconciliation_maps_to_500() {
        let err: AppError = Error::Reconciliation("booking vanished".to_string()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn payment_maps_to_502() {
        let err: AppError = Error::Payment("token fetch failed".to_string()).into();
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }
}
