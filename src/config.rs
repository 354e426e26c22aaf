use std::env;

use chrono::Duration;
use thiserror::Error;

/// Longest accepted access-token lifetime: one year.
pub const MAX_ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Signing settings for bearer tokens.
#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub algorithm: String,
    pub access_token_expire_minutes: i64,
}

/// Argon2 cost parameters used for newly created password hashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashingSettings {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashingSettings {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_port: u16,
    pub server_host: String,
    pub jwt: JwtSettings,
    pub hashing: HashingSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => database_url_from_parts(&lookup)?,
        };

        let access_token_expire_minutes: i64 =
            parse_or(&lookup, "ACCESS_TOKEN_EXPIRE_MINUTES", 30)?;
        validate_token_lifetime(access_token_expire_minutes)?;

        let defaults = HashingSettings::default();

        Ok(Self {
            database_url,
            server_port: parse_or(&lookup, "SERVER_PORT", 8080)?,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            jwt: JwtSettings {
                secret: lookup("SECRET_KEY")
                    .filter(|secret| !secret.is_empty())
                    .ok_or(ConfigError::Missing("SECRET_KEY"))?,
                algorithm: lookup("ALGORITHM").unwrap_or_else(|| "HS256".to_string()),
                access_token_expire_minutes,
            },
            hashing: HashingSettings {
                memory_kib: parse_or(&lookup, "ARGON2_MEMORY_KIB", defaults.memory_kib)?,
                iterations: parse_or(&lookup, "ARGON2_ITERATIONS", defaults.iterations)?,
                parallelism: parse_or(&lookup, "ARGON2_PARALLELISM", defaults.parallelism)?,
            },
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

/// Checks a token lifetime in minutes and converts it to a `Duration`.
pub fn validate_token_lifetime(minutes: i64) -> Result<Duration, ConfigError> {
    if !(1..=MAX_ACCESS_TOKEN_EXPIRE_MINUTES).contains(&minutes) {
        return Err(ConfigError::Invalid {
            key: "ACCESS_TOKEN_EXPIRE_MINUTES",
            reason: format!("must be between 1 and {}", MAX_ACCESS_TOKEN_EXPIRE_MINUTES),
        });
    }
    Duration::try_minutes(minutes).ok_or_else(|| ConfigError::Invalid {
        key: "ACCESS_TOKEN_EXPIRE_MINUTES",
        reason: "out of range".into(),
    })
}

fn database_url_from_parts<F>(lookup: &F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let part = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));
    Ok(format!(
        "postgres://{}:{}@{}:{}/{}",
        part("DATABASE_USERNAME")?,
        part("DATABASE_PASSWORD")?,
        part("DATABASE_HOSTNAME")?,
        lookup("DATABASE_PORT").unwrap_or_else(|| "5432".to_string()),
        part("DATABASE_NAME")?,
    ))
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
