use std::sync::Arc;

use crate::auth::{CredentialHasher, SessionResolver, TokenCodec};
use crate::config::{ConfigError, HashingSettings, JwtSettings};
use crate::store::{TaskRepository, UserRepository};

/// Everything a request handler needs, built once at startup and shared
/// read-only across workers via `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub tasks: Arc<dyn TaskRepository>,
    pub hasher: Arc<CredentialHasher>,
    pub tokens: Arc<TokenCodec>,
    pub sessions: SessionResolver,
}

impl AppState {
    pub fn new(
        jwt: &JwtSettings,
        hashing: &HashingSettings,
        users: Arc<dyn UserRepository>,
        tasks: Arc<dyn TaskRepository>,
    ) -> Result<Self, ConfigError> {
        let tokens = Arc::new(TokenCodec::new(jwt)?);
        let hasher = Arc::new(CredentialHasher::new(hashing)?);
        let sessions = SessionResolver::new(tokens.clone(), users.clone());

        Ok(Self {
            users,
            tasks,
            hasher,
            tokens,
            sessions,
        })
    }
}
