//!
//! # Custom Error Handling
//!
//! This module defines the caller-facing error type `AppError` used by the
//! route handlers, the persistence stores and the authentication middleware.
//!
//! `AppError` implements `actix_web::error::ResponseError` so handlers can
//! return it directly and get the matching HTTP status with a JSON body.
//! Authentication and authorization failures carry deliberately sparse
//! messages; the narrow reason behind them is logged, not returned.

use actix_web::{
    error::ResponseError,
    http::{header, StatusCode},
    HttpResponse,
};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

use crate::auth::error::AuthError;

/// Message returned for every authentication failure.
pub const CREDENTIALS_ERROR: &str = "Could not validate credentials";

/// Message returned for every authorization failure.
pub const FORBIDDEN_ERROR: &str = "Not authorized to perform requested action";

/// Represents all errors a request can end with.
///
/// Each variant maps to exactly one HTTP status in [`ResponseError::status_code`].
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication failed or is missing (HTTP 401).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// Authenticated, but the principal may not act on the resource (HTTP 403).
    #[error("Forbidden: {0}")]
    Forbidden(String),
    /// The requested resource does not exist (HTTP 404).
    #[error("Not Found: {0}")]
    NotFound(String),
    /// A uniqueness rule was violated, e.g. a duplicate email (HTTP 409).
    #[error("Conflict: {0}")]
    Conflict(String),
    /// Malformed request (HTTP 400).
    #[error("Bad Request: {0}")]
    BadRequest(String),
    /// Input failed `validator` rules (HTTP 422).
    #[error("Validation Error: {0}")]
    ValidationError(String),
    /// Unexpected server-side failure (HTTP 500).
    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
    /// A database operation failed (HTTP 500). The detail stays server-side.
    #[error("Database Error: {0}")]
    DatabaseError(String),
}

impl AppError {
    pub fn unauthorized() -> Self {
        AppError::Unauthorized(CREDENTIALS_ERROR.into())
    }

    pub fn forbidden() -> Self {
        AppError::Forbidden(FORBIDDEN_ERROR.into())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        let message = match self {
            AppError::Unauthorized(msg) => {
                builder.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
                msg.as_str()
            }
            AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::BadRequest(msg)
            | AppError::ValidationError(msg) => msg.as_str(),
            AppError::InternalServerError(msg) | AppError::DatabaseError(msg) => {
                log::error!("{}", msg);
                "Internal server error"
            }
        };
        builder.json(json!({ "error": message }))
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// Unique-constraint violations become `Conflict`; a missing row becomes
/// `NotFound`; everything else is a `DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict("Resource already exists".into())
            }
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// Token failures collapse into a generic `Unauthorized`; hashing and
/// signing failures are server faults.
impl From<AuthError> for AppError {
    fn from(error: AuthError) -> AppError {
        match error {
            AuthError::InvalidSignature
            | AuthError::TokenMalformed(_)
            | AuthError::TokenExpired => AppError::unauthorized(),
            AuthError::MalformedHash(_) | AuthError::Hashing(_) | AuthError::Signing(_) => {
                AppError::InternalServerError(error.to_string())
            }
        }
    }
}
