use anyhow::anyhow;
use estore_core::{AppError, AuthError, PasswordHasher};
use estore_db::AccountStore;
use estore_models::users::{UpdatePasswordRequest, UpdateUsernameRequest, User};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::modules::auth::service::{hash_password, verify_password};

pub struct UserService;

fn user_not_found() -> AppError {
    AppError::not_found(anyhow!("User not found"))
}

impl UserService {
    #[instrument(skip(store))]
    pub async fn get_user(store: &dyn AccountStore, id: Uuid) -> Result<User, AppError> {
        store.find_by_id(id).await?.ok_or_else(user_not_found)
    }

    #[instrument(skip(store))]
    pub async fn list_users(store: &dyn AccountStore) -> Result<Vec<User>, AppError> {
        Ok(store.list_users().await?)
    }

    #[instrument(skip(store, dto), fields(user.username = %dto.username))]
    pub async fn update_username(
        store: &dyn AccountStore,
        id: Uuid,
        dto: UpdateUsernameRequest,
    ) -> Result<User, AppError> {
        let user = store
            .update_username(id, &dto.username)
            .await?
            .ok_or_else(user_not_found)?;

        info!(user.id = %user.id, "Username updated");
        Ok(user)
    }

    /// Replaces a password after checking the current one. Tokens issued
    /// before the change stay valid until they expire.
    #[instrument(skip(store, hasher, dto))]
    pub async fn update_password(
        store: &dyn AccountStore,
        hasher: &PasswordHasher,
        id: Uuid,
        dto: UpdatePasswordRequest,
    ) -> Result<(), AppError> {
        let current_hash = store
            .find_password_hash(id)
            .await?
            .ok_or_else(user_not_found)?;

        if !verify_password(hasher, dto.old_password, current_hash).await? {
            warn!(user.id = %id, "Password change rejected: wrong current password");
            return Err(AuthError::InvalidCredentials.into());
        }

        let new_hash = hash_password(hasher, dto.new_password).await?;
        if !store.update_password_hash(id, &new_hash).await? {
            return Err(user_not_found());
        }

        info!(user.id = %id, "Password updated");
        Ok(())
    }

    /// Removes the identity and its credential together.
    #[instrument(skip(store))]
    pub async fn delete_user(store: &dyn AccountStore, id: Uuid) -> Result<(), AppError> {
        if !store.delete_account(id).await? {
            return Err(user_not_found());
        }

        info!(user.id = %id, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use estore_core::Role;
    use estore_db::MemoryAccountStore;

    use super::*;
    use crate::modules::auth::service::AuthService;

    async fn seeded() -> (MemoryAccountStore, PasswordHasher, User) {
        let store = MemoryAccountStore::new();
        let hasher = PasswordHasher::new(4).unwrap();
        let user = AuthService::register_account(
            &store,
            &hasher,
            "alice".to_string(),
            "pw-alice-1".to_string(),
            Role::RegularUser,
        )
        .await
        .unwrap();
        (store, hasher, user)
    }

    #[tokio::test]
    async fn test_get_unknown_user_is_404() {
        let (store, _, _) = seeded().await;
        let err = UserService::get_user(&store, Uuid::new_v4())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_password_requires_current_password() {
        let (store, hasher, user) = seeded().await;
        let err = UserService::update_password(
            &store,
            &hasher,
            user.id,
            UpdatePasswordRequest {
                old_password: "wrong".to_string(),
                new_password: "new-password".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_update_password_replaces_hash() {
        let (store, hasher, user) = seeded().await;
        UserService::update_password(
            &store,
            &hasher,
            user.id,
            UpdatePasswordRequest {
                old_password: "pw-alice-1".to_string(),
                new_password: "new-password".to_string(),
            },
        )
        .await
        .unwrap();

        let authenticated =
            AuthService::authenticate(&store, &hasher, "alice", "new-password".to_string()).await;
        assert!(authenticated.is_ok());
        let stale =
            AuthService::authenticate(&store, &hasher, "alice", "pw-alice-1".to_string()).await;
        assert!(matches!(stale, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_delete_user_twice() {
        let (store, _, user) = seeded().await;
        UserService::delete_user(&store, user.id).await.unwrap();
        let err = UserService::delete_user(&store, user.id).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(store.record_counts().await, (0, 0));
    }
}
