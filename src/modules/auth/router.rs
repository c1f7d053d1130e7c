use axum::{Router, routing::post};
use estore_core::AccessTier;

use super::controller::{login_user, logout_user, refresh_token, register_user};
use crate::router::TieredRouter;
use crate::state::AppState;

pub fn init_auth_router(state: AppState) -> Router<AppState> {
    TieredRouter::new(state)
        .route("/login", AccessTier::Public, post(login_user))
        .route("/refresh", AccessTier::Public, post(refresh_token))
        .route("/register", AccessTier::Public, post(register_user))
        .route("/logout", AccessTier::AuthenticatedUser, post(logout_user))
        .into_router()
}
