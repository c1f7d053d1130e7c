//! # estore auth
//!
//! Bearer token handling for the estore API.
//!
//! - [`clock`]: the time source every expiry decision is made against
//! - [`claims`]: fixed-shape access and refresh token payloads
//! - [`jwt`]: [`TokenIssuer`], which signs, validates, and refreshes tokens
//!
//! Tokens are stateless. Once issued they stay valid until `exp`, even if the
//! account's password changes or the account is deleted.

pub mod claims;
pub mod clock;
pub mod jwt;

pub use claims::{Claims, RefreshTokenClaims, TokenUse};
#[cfg(any(test, feature = "test-utils"))]
pub use clock::ManualClock;
pub use clock::{Clock, SystemClock};
pub use jwt::{TOKEN_TYPE, TokenIssuer, TokenPair};
