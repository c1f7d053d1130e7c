use axum::{
    Router,
    routing::{delete, get, put},
};
use estore_core::AccessTier;

use super::controller::{
    delete_user, get_current_user, get_user, list_users, update_current_user, update_password,
};
use crate::router::TieredRouter;
use crate::state::AppState;

pub fn init_users_router(state: AppState) -> Router<AppState> {
    TieredRouter::new(state)
        .route("/", AccessTier::Admin, get(list_users))
        .route(
            "/me",
            AccessTier::AuthenticatedUser,
            get(get_current_user).put(update_current_user),
        )
        .route("/{id}", AccessTier::AuthenticatedUser, get(get_user))
        .route("/{id}", AccessTier::Admin, delete(delete_user))
        .route(
            "/{id}/password",
            AccessTier::AuthenticatedUser,
            put(update_password),
        )
        .into_router()
}
