use argon2::{
    password_hash::{
        self, rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

use crate::auth::error::AuthError;
use crate::config::{ConfigError, HashingSettings};

/// Argon2id password hasher.
///
/// Hashes are PHC strings that embed algorithm, version, cost parameters
/// and salt, so verification always re-derives with the parameters the hash
/// was created with, whatever the hasher's current settings are.
#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
    // Hash with the current cost parameters, checked when there is no
    // stored hash so the miss costs as much as a real verification.
    decoy: String,
}

impl CredentialHasher {
    pub fn new(settings: &HashingSettings) -> Result<Self, ConfigError> {
        let params = Params::new(
            settings.memory_kib,
            settings.iterations,
            settings.parallelism,
            None,
        )
        .map_err(|e| ConfigError::Invalid {
            key: "ARGON2_*",
            reason: e.to_string(),
        })?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let salt = SaltString::generate(&mut OsRng);
        let decoy = argon2
            .hash_password(b"decoy-credential", &salt)
            .map_err(|e| ConfigError::Invalid {
                key: "ARGON2_*",
                reason: e.to_string(),
            })?
            .to_string();

        Ok(Self { argon2, decoy })
    }

    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    /// Returns `Ok(false)` on mismatch; errors only when `hashed` is unusable.
    pub fn verify(&self, password: &str, hashed: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hashed).map_err(|e| AuthError::MalformedHash(e.to_string()))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::MalformedHash(e.to_string())),
        }
    }

    /// Runs a full verification against an internal hash and discards the
    /// result. Used when the account does not exist.
    pub fn verify_decoy(&self, password: &str) {
        if let Err(e) = self.verify(password, &self.decoy) {
            log::error!("decoy verification failed: {}", e);
        }
    }
}
