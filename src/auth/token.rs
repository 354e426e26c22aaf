use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::auth::error::AuthError;
use crate::config::{validate_token_lifetime, ConfigError, JwtSettings};

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the user's id rendered as a string.
    pub sub: String,
    /// Issue timestamp (seconds since epoch).
    pub iat: i64,
    /// Absolute expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: i32, issued_at: DateTime<Utc>, expires_in: Duration) -> Result<Self, AuthError> {
        let expires_at = issued_at
            .checked_add_signed(expires_in)
            .ok_or_else(|| AuthError::Signing("expiry is out of range".into()))?;
        Ok(Self {
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        })
    }

    /// Parses the subject back into a user id.
    pub fn user_id(&self) -> Result<i32, AuthError> {
        self.sub
            .parse()
            .map_err(|_| AuthError::TokenMalformed(format!("subject `{}` is not a user id", self.sub)))
    }
}

/// Issues and verifies signed, time-bounded bearer tokens.
///
/// The key, algorithm and lifetime are fixed at construction. Only HMAC
/// algorithms are accepted since the key is a shared secret.
///
/// Expiry is checked against the verifier's own clock with no leeway, so
/// clock skew between an issuing and a verifying process shortens or
/// lengthens the effective lifetime. Issued tokens cannot be revoked before
/// they expire.
pub struct TokenCodec {
    header: Header,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl TokenCodec {
    pub fn new(settings: &JwtSettings) -> Result<Self, ConfigError> {
        let algorithm = Algorithm::from_str(&settings.algorithm).map_err(|_| ConfigError::Invalid {
            key: "ALGORITHM",
            reason: format!("unknown algorithm `{}`", settings.algorithm),
        })?;
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(ConfigError::Invalid {
                key: "ALGORITHM",
                reason: format!("`{}` needs a key pair, only HS256/HS384/HS512 are supported", settings.algorithm),
            });
        }
        if settings.secret.is_empty() {
            return Err(ConfigError::Missing("SECRET_KEY"));
        }
        let lifetime = validate_token_lifetime(settings.access_token_expire_minutes)?;

        let mut validation = Validation::new(algorithm);
        // Expiry is checked in `decode_at` against an explicit clock.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            header: Header::new(algorithm),
            encoding_key: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            validation,
            lifetime,
        })
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issues a token for `user_id` expiring one lifetime from now.
    pub fn issue(&self, user_id: i32) -> Result<String, AuthError> {
        self.issue_at(user_id, Utc::now())
    }

    pub fn issue_at(&self, user_id: i32, now: DateTime<Utc>) -> Result<String, AuthError> {
        self.encode(&Claims::new(user_id, now, self.lifetime)?)
    }

    pub fn encode(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&self.header, claims, &self.encoding_key).map_err(|e| AuthError::Signing(e.to_string()))
    }

    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        self.decode_at(token, Utc::now())
    }

    /// Verifies `token` and returns its claims as seen at instant `now`.
    pub fn decode_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)?.claims;
        claims.user_id()?;

        if now.timestamp() >= claims.exp {
            return Err(AuthError::TokenExpired);
        }
        Ok(claims)
    }
}
