//! User Error Types
//!
//! This module provides user-service error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use serde::Serialize;
use thiserror::Error;

/// User-service result type alias
pub type UserResult<T> = Result<T, UserError>;

/// A single failed field rule, reported back in the `data` array
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// User-service error variants
#[derive(Debug, Error)]
pub enum UserError {
    /// Request body failed field validation
    #[error("Unprocessable Entity")]
    Validation(Vec<FieldError>),

    /// Request body is not the expected JSON
    #[error("{0}")]
    InvalidBody(String),

    #[error("username already exists")]
    UsernameExists,

    #[error("email already exists")]
    EmailExists,

    #[error("password does not match")]
    PasswordDoesNotMatch,

    #[error("user not found")]
    UserNotFound,

    #[error("role not found")]
    RoleNotFound,

    /// Unknown user or wrong password; the two are not distinguished
    #[error("username or password is incorrect")]
    InvalidCredentials,

    /// Bearer token or service signature rejected
    #[error("unauthorized")]
    Unauthorized,

    #[error("too many requests")]
    TooManyRequests,

    /// Database error; the driver message never reaches the client
    #[error("SQL error")]
    Database(#[from] sqlx::Error),

    #[error("internal server error")]
    Internal(String),
}

impl UserError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            UserError::Unauthorized => StatusCode::UNAUTHORIZED,
            UserError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            UserError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            UserError::Validation(_)
            | UserError::InvalidBody(_)
            | UserError::UsernameExists
            | UserError::EmailExists
            | UserError::PasswordDoesNotMatch
            | UserError::UserNotFound
            | UserError::RoleNotFound
            | UserError::InvalidCredentials
            | UserError::Database(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            UserError::Unauthorized => ErrorKind::Unauthorized,
            UserError::TooManyRequests => ErrorKind::TooManyRequests,
            UserError::Internal(_) => ErrorKind::InternalServerError,
            _ => ErrorKind::BadRequest,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let error = AppError::new(self.kind(), self.to_string());
        match self {
            UserError::Validation(fields) => match serde_json::to_value(fields) {
                Ok(data) => error.with_data(data),
                Err(_) => error,
            },
            _ => error,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            UserError::Database(e) => {
                tracing::error!(error = %e, "User database error");
            }
            UserError::Internal(msg) => {
                tracing::error!(message = %msg, "User internal error");
            }
            UserError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            UserError::Unauthorized => {
                tracing::warn!("Unauthorized request rejected");
            }
            UserError::TooManyRequests => {
                tracing::warn!("Rate limit exceeded");
            }
            _ => {
                tracing::debug!(error = %self, "User error");
            }
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<validator::ValidationErrors> for UserError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = field.to_string();
                errs.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid ({})", field, e.code));
                    FieldError::new(field.clone(), message)
                })
            })
            .collect();

        fields.sort_by(|a, b| a.field.cmp(&b.field));
        UserError::Validation(fields)
    }
}

impl From<jsonwebtoken::errors::Error> for UserError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        tracing::debug!(error = %err, "Session token rejected");
        UserError::Unauthorized
    }
}
