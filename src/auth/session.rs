use std::sync::Arc;

use log::{debug, warn};

use crate::auth::token::TokenCodec;
use crate::error::AppError;
use crate::models::User;
use crate::store::UserRepository;

/// Turns a bearer token into the user it was issued for.
///
/// Every call decodes the token and looks the user up again; nothing is
/// cached, so a deleted user loses access on their very next request.
#[derive(Clone)]
pub struct SessionResolver {
    tokens: Arc<TokenCodec>,
    users: Arc<dyn UserRepository>,
}

impl SessionResolver {
    pub fn new(tokens: Arc<TokenCodec>, users: Arc<dyn UserRepository>) -> Self {
        Self { tokens, users }
    }

    /// Resolves the principal behind `token`.
    ///
    /// All failures, whether a bad signature, an expired token, an unknown
    /// user or a failed lookup, surface as the same `Unauthorized` error.
    pub async fn resolve(&self, token: &str) -> Result<User, AppError> {
        let claims = self.tokens.decode(token).map_err(|e| {
            debug!("Rejected bearer token: {}", e);
            AppError::unauthorized()
        })?;
        let user_id = claims.user_id().map_err(|e| {
            debug!("Rejected bearer token: {}", e);
            AppError::unauthorized()
        })?;

        match self.users.find_user_by_id(user_id).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => {
                debug!("Token subject {} no longer exists", user_id);
                Err(AppError::unauthorized())
            }
            Err(e) => {
                warn!("User lookup failed while resolving token: {}", e);
                Err(AppError::unauthorized())
            }
        }
    }
}
