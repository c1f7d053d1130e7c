//! Admin account creation.

use anyhow::anyhow;
use estore::modules::auth::service::AuthService;
use estore_core::{AuthError, PasswordHasher, Role};
use estore_db::AccountStore;
use estore_models::auth::RegisterRequest;
use estore_models::users::User;
use validator::Validate;

/// Creates an admin account, applying the same username and password rules
/// as self-registration.
pub async fn create_admin(
    store: &dyn AccountStore,
    hasher: &PasswordHasher,
    username: String,
    password: String,
) -> anyhow::Result<User> {
    let request = RegisterRequest { username, password };
    request
        .validate()
        .map_err(|e| anyhow!("Invalid admin account: {e}"))?;

    match AuthService::register_account(
        store,
        hasher,
        request.username,
        request.password,
        Role::Admin,
    )
    .await
    {
        Ok(user) => Ok(user),
        Err(AuthError::DuplicateUsername) => Err(anyhow!("Username already exists")),
        Err(e) => Err(anyhow::Error::new(e).context("Failed to create admin account")),
    }
}
