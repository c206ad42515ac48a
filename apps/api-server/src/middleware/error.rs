//! Error handling - maps domain failures onto the client-facing
//! `{success: false, message, errors?}` body.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use quill_shared::ErrorResponse;
use std::fmt;

use quill_core::error::{DomainError, RepoError};
use quill_core::ports::AuthError;

/// Application-level error type for handlers.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Unauthorized,
    Forbidden(String),
    Conflict(String),
    Internal(String),
    Validation(Vec<String>),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {msg}"),
            AppError::BadRequest(msg) => write!(f, "Bad request: {msg}"),
            AppError::Unauthorized => write!(f, "Unauthorized"),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {msg}"),
            AppError::Conflict(msg) => write!(f, "Conflict: {msg}"),
            AppError::Internal(msg) => write!(f, "Internal error: {msg}"),
            AppError::Validation(errors) => write!(f, "Validation errors: {errors:?}"),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::new(detail.clone()),
            AppError::BadRequest(detail) => ErrorResponse::new(detail.clone()),
            AppError::Unauthorized => ErrorResponse::new("Unauthorized"),
            AppError::Forbidden(detail) => ErrorResponse::new(detail.clone()),
            AppError::Conflict(detail) => ErrorResponse::new(detail.clone()),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {detail}");
                ErrorResponse::new("Internal server error")
            }
            AppError::Validation(errors) => {
                ErrorResponse::new("Validation failed").with_errors(errors.clone())
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity, id } => {
                AppError::NotFound(format!("{entity} with id {id} not found"))
            }
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::Duplicate(msg) => AppError::Conflict(msg),
            DomainError::Forbidden => {
                AppError::Forbidden("You are not allowed to perform this action".to_string())
            }
            DomainError::Unauthorized => AppError::Unauthorized,
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {msg}");
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {msg}");
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TokenExpired | AuthError::InvalidToken(_) | AuthError::MissingAuth => {
                AppError::Unauthorized
            }
            AuthError::InvalidCredentials => AppError::Unauthorized,
            AuthError::InsufficientPermissions => {
                AppError::Forbidden("Insufficient permissions".to_string())
            }
            AuthError::HashingError(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
