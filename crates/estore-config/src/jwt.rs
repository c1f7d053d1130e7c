use std::fmt;

use crate::{ConfigError, parse_or, process_env};

pub const DEFAULT_ACCESS_TOKEN_EXPIRY: i64 = 3600;
pub const DEFAULT_REFRESH_TOKEN_EXPIRY: i64 = 604_800;
/// Ten years. Keeps `iat + lifetime` and chrono durations far from overflow.
pub const MAX_TOKEN_EXPIRY: i64 = 315_360_000;

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Access token lifetime in seconds.
    pub access_token_expiry: i64,
    /// Refresh token lifetime in seconds.
    pub refresh_token_expiry: i64,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("access_token_expiry", &self.access_token_expiry)
            .field("refresh_token_expiry", &self.refresh_token_expiry)
            .finish()
    }
}

impl JwtConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(process_env)
    }

    /// `JWT_SECRET` is mandatory; there is no fallback signing key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if secret.trim().is_empty() {
            return Err(ConfigError::Empty("JWT_SECRET"));
        }

        let access_token_expiry =
            positive(&lookup, "JWT_ACCESS_EXPIRY", DEFAULT_ACCESS_TOKEN_EXPIRY)?;
        let refresh_token_expiry =
            positive(&lookup, "JWT_REFRESH_EXPIRY", DEFAULT_REFRESH_TOKEN_EXPIRY)?;

        Ok(Self {
            secret,
            access_token_expiry,
            refresh_token_expiry,
        })
    }

    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_token_expiry: DEFAULT_ACCESS_TOKEN_EXPIRY,
            refresh_token_expiry: DEFAULT_REFRESH_TOKEN_EXPIRY,
        }
    }
}

fn positive<F>(lookup: &F, key: &'static str, default: i64) -> Result<i64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = parse_or(lookup, key, default)?;
    if value <= 0 {
        return Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: "must be a positive number of seconds".to_string(),
        });
    }
    if value > MAX_TOKEN_EXPIRY {
        return Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: format!("must not exceed {MAX_TOKEN_EXPIRY} seconds"),
        });
    }
    Ok(value)
}
