//! Authentication and authorization core.
//!
//! - [`password`]: Argon2id credential hashing.
//! - [`token`]: signed, time-bounded bearer tokens.
//! - [`session`]: bearer token to principal resolution.
//! - [`guard`]: per-resource ownership checks.
//! - [`middleware`] and [`extractors`]: the actix-web side of the above.

pub mod error;
pub mod extractors;
pub mod guard;
pub mod middleware;
pub mod password;
pub mod session;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

pub use error::AuthError;
pub use extractors::CurrentUser;
pub use guard::{authorize, require_owned, Owned};
pub use middleware::AuthMiddleware;
pub use password::CredentialHasher;
pub use session::SessionResolver;
pub use token::{Claims, TokenCodec};

/// Represents the payload for a user login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// User's email address.
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Response to a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The signed bearer token.
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}
