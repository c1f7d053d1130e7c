use std::fmt;

use async_trait::async_trait;
use estore_core::{AppError, AuthError, Role};
use estore_models::users::User;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write. `username` is the only
    /// unique column a caller can influence.
    #[error("unique constraint violated")]
    UniqueViolation,
    #[error("stored row is invalid: {0}")]
    Corrupt(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation => AuthError::DuplicateUsername,
            other => AuthError::persistence(other),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AuthError::from(err).into()
    }
}

/// Everything needed to create an account. The password is already hashed.
#[derive(Clone)]
pub struct NewAccount {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

impl fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccount")
            .field("username", &self.username)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// An identity together with its stored password hash.
#[derive(Clone)]
pub struct AccountCredentials {
    pub user: User,
    pub password_hash: String,
}

impl fmt::Debug for AccountCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountCredentials")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

/// Persistence for identity and credential records.
///
/// Implementations guarantee that an identity is never observable without
/// its credential: `create_account` and `delete_account` each act on both
/// records atomically.
#[async_trait]
pub trait AccountStore: Send + Sync + fmt::Debug {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<AccountCredentials>, StoreError>;

    async fn find_password_hash(&self, user_id: Uuid) -> Result<Option<String>, StoreError>;

    /// Creates the identity and its credential in one transaction. A taken
    /// username surfaces as [`StoreError::UniqueViolation`] and leaves
    /// nothing behind.
    async fn create_account(&self, account: NewAccount) -> Result<User, StoreError>;

    /// All identities, oldest first.
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    /// `None` when no account has this id.
    async fn update_username(&self, id: Uuid, username: &str)
    -> Result<Option<User>, StoreError>;

    /// `false` when no account has this id.
    async fn update_password_hash(
        &self,
        user_id: Uuid,
        password_hash: &str,
    ) -> Result<bool, StoreError>;

    /// Removes credential and identity together. `false` when no account
    /// has this id.
    async fn delete_account(&self, id: Uuid) -> Result<bool, StoreError>;
}
