//! Error Handling Utilities
//!
//! Operational error taxonomy for the LMS service and its HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde::Serialize;
use std::sync::OnceLock;
use thiserror::Error;

/// Main application error type that can represent errors from any feature
///
/// Operational variants carry a user-facing message and map to a 4xx status.
/// Wrapper variants (database, hashing, upload plumbing) are unexpected
/// faults: they are logged internally and collapsed to a generic message so
/// internals never leak to the client in production mode.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed or incomplete client input
    #[error("{0}")]
    BadRequest(String),

    /// Missing, malformed, or expired credentials
    #[error("{0}")]
    Unauthenticated(String),

    /// Authenticated but not allowed to perform the operation
    #[error("{0}")]
    Forbidden(String),

    /// Resource not found
    #[error("{0}")]
    NotFound(String),

    /// Duplicate resource (surfaced as 400 in this API, not 409)
    #[error("{0}")]
    Conflict(String),

    /// Upstream persistence took too long
    #[error("{0}")]
    RequestTimeout(String),

    /// Upstream connection was reset mid-request
    #[error("{0}")]
    UpstreamReset(String),

    /// Object storage write failure
    #[error("File upload failed: {0}")]
    Upload(String),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Password hashing errors
    #[error("Password hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    /// Generic internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::RequestTimeout(_) => StatusCode::REQUEST_TIMEOUT,
            AppError::UpstreamReset(_) => StatusCode::BAD_GATEWAY,
            AppError::Upload(_)
            | AppError::Database(_)
            | AppError::Hashing(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether this is an anticipated, user-facing failure whose message may
    /// be echoed to the client as-is
    pub fn is_operational(&self) -> bool {
        !matches!(
            self,
            AppError::Database(_) | AppError::Hashing(_) | AppError::Internal(_)
        )
    }
}

/// Standard error response body: `{status, message}` with `status` of "fail"
/// for 4xx and "error" for 5xx
#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(status_code: StatusCode, message: &str) -> Self {
        let status = if status_code.is_client_error() {
            "fail"
        } else {
            "error"
        };
        Self {
            status: status.to_string(),
            message: message.to_string(),
            detail: None,
        }
    }
}

/// True outside production mode; controls whether raw error detail is echoed
/// in responses
fn is_development() -> bool {
    static DEV: OnceLock<bool> = OnceLock::new();
    *DEV.get_or_init(|| {
        std::env::var("APP_ENV")
            .map(|v| v != "production")
            .unwrap_or(true)
    })
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if self.is_operational() {
            self.to_string()
        } else {
            error!("unexpected internal error: {}", self);
            "Something went very wrong!".to_string()
        };

        let mut body = ErrorResponse::new(status, &message);
        if !self.is_operational() && is_development() {
            body.detail = Some(self.to_string());
        }

        (status, Json(body)).into_response()
    }
}

/// Result type alias for operations that can return AppError
pub type AppResult<T> = Result<T, AppError>;

/// Translate low-level sqlx faults into the nearest operational error kind
///
/// Unique-constraint violations become Conflict with the supplied message;
/// pool timeouts and dropped connections become their dedicated statuses.
/// Everything else stays a Database error and is collapsed at the boundary.
pub fn map_db_error(err: sqlx::Error, conflict_constraint: &str, conflict_msg: &str) -> AppError {
    match err {
        sqlx::Error::Database(db_err) => {
            if db_err.constraint() == Some(conflict_constraint) {
                AppError::Conflict(conflict_msg.to_string())
            } else {
                AppError::Database(sqlx::Error::Database(db_err))
            }
        }
        sqlx::Error::PoolTimedOut => {
            AppError::RequestTimeout("Request took too long! Please try again.".to_string())
        }
        sqlx::Error::Io(_) => {
            AppError::UpstreamReset("Connection was reset. Please try again later.".to_string())
        }
        other => AppError::Database(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Unauthenticated("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::RequestTimeout("x".into()).status_code(),
            StatusCode::REQUEST_TIMEOUT
        );
        assert_eq!(
            AppError::UpstreamReset("x".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    /// Duplicates are deliberately 400 in this API, not 409
    #[test]
    fn test_conflict_maps_to_bad_request() {
        assert_eq!(
            AppError::Conflict("duplicate".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_operational_classification() {
        assert!(AppError::NotFound("x".into()).is_operational());
        assert!(AppError::Conflict("x".into()).is_operational());
        assert!(AppError::Upload("x".into()).is_operational());
        assert!(!AppError::Internal("x".into()).is_operational());
        assert!(!AppError::Database(sqlx::Error::RowNotFound).is_operational());
    }

    #[test]
    fn test_error_response_status_field() {
        let fail = ErrorResponse::new(StatusCode::BAD_REQUEST, "nope");
        assert_eq!(fail.status, "fail");

        let error = ErrorResponse::new(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert_eq!(error.status, "error");
    }

    #[test]
    fn test_map_db_error_pool_timeout() {
        let err = map_db_error(sqlx::Error::PoolTimedOut, "some_key", "dup");
        assert!(matches!(err, AppError::RequestTimeout(_)));
    }

    #[test]
    fn test_map_db_error_passthrough() {
        let err = map_db_error(sqlx::Error::RowNotFound, "some_key", "dup");
        assert!(matches!(err, AppError::Database(_)));
    }
}
