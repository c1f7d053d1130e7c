//! # estore config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: token signing secret and lifetimes
//! - [`password`]: bcrypt work factor
//! - [`cors`]: allowed browser origins
//! - [`server`]: listen address and metrics exporter
//!
//! Every type has a `from_env()` constructor and a `from_lookup()` variant
//! that reads through an arbitrary key lookup.
//!
//! # Example
//!
//! ```ignore
//! use estore_config::{JwtConfig, PasswordConfig};
//!
//! let jwt_config = JwtConfig::from_env()?;
//! let password_config = PasswordConfig::from_env()?;
//! ```

pub mod cors;
pub mod jwt;
pub mod password;
pub mod server;

use std::str::FromStr;

use thiserror::Error;

pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use password::PasswordConfig;
pub use server::{MetricsConfig, ServerConfig};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("{key} has invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

pub(crate) fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Parses `key` when present, falls back to `default` when absent.
pub(crate) fn parse_or<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
pub(crate) fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let pairs: Vec<(String, String)> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }
}
