use axum::Json;
use axum::extract::{Path, State};
use estore_core::{AppError, ErrorResponse};
use estore_models::auth::MessageResponse;
use estore_models::users::{UpdatePasswordRequest, UpdateUsernameRequest, User};
use tracing::instrument;
use uuid::Uuid;

use super::service::UserService;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Get the current user's profile
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Account no longer exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_current_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<User>, AppError> {
    let user = UserService::get_user(state.store.as_ref(), auth_user.user_id()).await?;
    Ok(Json(user))
}

/// Change the current user's username
#[utoipa::path(
    put,
    path = "/api/users/me",
    request_body = UpdateUsernameRequest,
    responses(
        (status = 200, description = "Username updated", body = User),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 409, description = "Username already exists", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn update_current_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateUsernameRequest>,
) -> Result<Json<User>, AppError> {
    let user = UserService::update_username(state.store.as_ref(), auth_user.user_id(), dto).await?;
    Ok(Json(user))
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    let user = UserService::get_user(state.store.as_ref(), id).await?;
    Ok(Json(user))
}

/// List all users (admin only)
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All users", body = Vec<User>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    let users = UserService::list_users(state.store.as_ref()).await?;
    Ok(Json(users))
}

/// Delete a user and their credential (admin only)
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    UserService::delete_user(state.store.as_ref(), id).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}

/// Change a user's password (the user themself or an admin)
#[utoipa::path(
    put,
    path = "/api/users/{id}/password",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = UpdatePasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 401, description = "Unauthorized or wrong current password", body = ErrorResponse),
        (status = 403, description = "Not the account owner or an admin", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn update_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdatePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    auth_user.ensure_owner_or_admin(id)?;
    UserService::update_password(state.store.as_ref(), &state.hasher, id, dto).await?;
    Ok(Json(MessageResponse::new("Password updated successfully")))
}
