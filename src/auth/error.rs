//! Narrow failure kinds raised by the credential hasher and the token codec.
//!
//! These never reach a client directly. The session resolver and the login
//! handler translate them into [`AppError`](crate::error::AppError) values,
//! keeping the precise reason for the logs only.

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// A stored password hash could not be parsed or uses an unsupported scheme.
    #[error("malformed password hash: {0}")]
    MalformedHash(String),

    /// The token's signature does not match the configured key.
    #[error("token signature is invalid")]
    InvalidSignature,

    /// The token is not a well-formed JWT or lacks required claims.
    #[error("malformed token: {0}")]
    TokenMalformed(String),

    /// The token's expiration instant has passed.
    #[error("token has expired")]
    TokenExpired,

    /// The hashing primitive itself failed.
    #[error("failed to hash password: {0}")]
    Hashing(String),

    /// The signing primitive itself failed.
    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(error: jsonwebtoken::errors::Error) -> Self {
        match error.kind() {
            JwtErrorKind::InvalidSignature => AuthError::InvalidSignature,
            JwtErrorKind::ExpiredSignature => AuthError::TokenExpired,
            JwtErrorKind::MissingRequiredClaim(claim) => {
                AuthError::TokenMalformed(format!("missing required claim `{}`", claim))
            }
            _ => AuthError::TokenMalformed(error.to_string()),
        }
    }
}
