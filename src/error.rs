//! Error types for the Washbay server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Machine-readable error codes returned alongside every error response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthorized = 2,
    DbFailure = 3,
    NoSuchData = 4,
    BadValue = 5,
    Duplicate = 6,
    SlotAlreadyBooked = 7,
    Timeout = 8,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// A write failed and rolling the transaction back failed as well
    #[error("{cause} (rollback also failed: {rollback})")]
    Rollback {
        cause: Box<AppError>,
        rollback: sqlx::Error,
    },

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Unique-key violation raised by PostgreSQL
    pub fn is_unique_violation(&self) -> bool {
        self.pg_code().as_deref() == Some("23505")
    }

    /// Foreign-key violation raised by PostgreSQL
    pub fn is_foreign_key_violation(&self) -> bool {
        self.pg_code().as_deref() == Some("23503")
    }

    fn pg_code(&self) -> Option<String> {
        match self {
            AppError::Database(sqlx::Error::Database(db_err)) => {
                db_err.code().map(|c| c.into_owned())
            }
            _ => None,
        }
    }

    fn parts(&self) -> (StatusCode, ErrorCode, String) {
        match self {
            AppError::Authentication(msg) => {
                (StatusCode::UNAUTHORIZED, ErrorCode::NotAuthorized, msg.clone())
            }
            AppError::Authorization(msg) => {
                (StatusCode::FORBIDDEN, ErrorCode::NotAuthorized, msg.clone())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchData, msg.clone()),
            AppError::Validation(msg) | AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone())
            }
            AppError::Conflict(msg) => {
                (StatusCode::CONFLICT, ErrorCode::SlotAlreadyBooked, msg.clone())
            }
            AppError::Timeout(msg) => {
                tracing::warn!("Operation timed out: {}", msg);
                (StatusCode::GATEWAY_TIMEOUT, ErrorCode::Timeout, msg.clone())
            }
            AppError::Database(e) => {
                if self.is_unique_violation() {
                    tracing::warn!("Unique constraint violation: {}", e);
                    (
                        StatusCode::CONFLICT,
                        ErrorCode::Duplicate,
                        "A record with that value already exists".to_string(),
                    )
                } else if self.is_foreign_key_violation() {
                    tracing::warn!("Foreign key violation: {}", e);
                    (
                        StatusCode::CONFLICT,
                        ErrorCode::NoSuchData,
                        "Referenced record does not exist".to_string(),
                    )
                } else {
                    tracing::error!("Database error: {:?}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorCode::DbFailure,
                        "Database error".to_string(),
                    )
                }
            }
            AppError::Rollback { cause, rollback } => {
                tracing::error!("Transaction failed: {}; rollback failed: {:?}", cause, rollback);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let msgs: Vec<String> = errs
                    .iter()
                    .map(|err| {
                        err.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| err.code.to_string())
                    })
                    .collect();
                format!("{}: {}", field, msgs.join(", "))
            })
            .collect();
        AppError::Validation(messages.join("; "))
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::Authentication("x".into()), StatusCode::UNAUTHORIZED),
            (AppError::Authorization("x".into()), StatusCode::FORBIDDEN),
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Conflict("x".into()), StatusCode::CONFLICT),
            (AppError::Timeout("x".into()), StatusCode::GATEWAY_TIMEOUT),
            (AppError::Database(sqlx::Error::RowNotFound), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_rollback_reports_both_errors() {
        let err = AppError::Rollback {
            cause: Box::new(AppError::Conflict("slot 10:00 already booked".into())),
            rollback: sqlx::Error::PoolClosed,
        };
        let text = err.to_string();
        assert!(text.contains("slot 10:00 already booked"));
        assert!(text.contains("rollback also failed"));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
