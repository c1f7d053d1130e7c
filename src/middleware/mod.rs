//! Request-time access control.
//!
//! - [`access`]: the per-route tier guard installed by
//!   [`TieredRouter`](crate::router::TieredRouter)
//! - [`auth`]: the [`AuthUser`](auth::AuthUser) extractor and the
//!   owner-or-admin predicate
//!
//! # Request flow
//!
//! 1. A public route runs its handler directly.
//! 2. Any other route first passes through [`access::enforce_access_tier`],
//!    which reads `Authorization: Bearer <token>`, validates the access
//!    token, checks the route's tier against the token's role, and binds a
//!    [`CurrentUser`](auth::CurrentUser) to the request.
//! 3. Handlers read that identity through [`AuthUser`](auth::AuthUser).
//!
//! # Example
//!
//! ```ignore
//! async fn update_password(
//!     auth_user: AuthUser,
//!     Path(id): Path<Uuid>,
//! ) -> Result<impl IntoResponse, AppError> {
//!     auth_user.ensure_owner_or_admin(id)?;
//!     // ...
//! }
//! ```

pub mod access;
pub mod auth;
