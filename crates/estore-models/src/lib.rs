//! # estore models
//!
//! Domain models and request/response DTOs shared by the HTTP layer, the
//! persistence layer, and the CLI.
//!
//! - [`auth`]: login, registration, and token DTOs
//! - [`users`]: the [`User`](users::User) identity and profile DTOs

pub mod auth;
pub mod users;

use std::borrow::Cow;

use estore_core::password::MAX_PASSWORD_BYTES;
use validator::ValidationError;

/// bcrypt ignores everything past 72 bytes, so longer passwords are refused
/// instead of being silently truncated.
pub fn validate_password_bytes(password: &str) -> Result<(), ValidationError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ValidationError::new("password_too_long").with_message(Cow::Owned(format!(
            "Password must be at most {MAX_PASSWORD_BYTES} bytes"
        ))));
    }
    Ok(())
}
