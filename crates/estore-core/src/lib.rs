//! # estore core
//!
//! Shared building blocks for the estore API crates:
//!
//! - [`errors`]: the HTTP-facing [`AppError`](errors::AppError) and the
//!   authentication domain error [`AuthError`](errors::AuthError)
//! - [`password`]: bcrypt hashing and verification
//! - [`access`]: account roles and route access tiers

pub mod access;
pub mod errors;
pub mod password;

pub use access::{AccessTier, Role};
pub use errors::{AppError, AuthError, ErrorResponse};
pub use password::PasswordHasher;
