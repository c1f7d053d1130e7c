use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use estore_models::users::User;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::store::{AccountCredentials, AccountStore, NewAccount, StoreError};

/// In-process [`AccountStore`] with the same uniqueness and atomicity rules
/// as the Postgres schema. Each operation takes the lock once, so a create
/// or delete is never observed half done.
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    inner: RwLock<Accounts>,
}

#[derive(Debug, Default)]
struct Accounts {
    users: HashMap<Uuid, User>,
    credentials: HashMap<Uuid, String>,
    usernames: HashMap<String, Uuid>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of identity and credential records currently held.
    pub async fn record_counts(&self) -> (usize, usize) {
        let accounts = self.inner.read().await;
        (accounts.users.len(), accounts.credentials.len())
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let accounts = self.inner.read().await;
        Ok(accounts
            .usernames
            .get(username)
            .and_then(|id| accounts.users.get(id))
            .cloned())
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<AccountCredentials>, StoreError> {
        let accounts = self.inner.read().await;
        let Some(id) = accounts.usernames.get(username) else {
            return Ok(None);
        };

        match (accounts.users.get(id), accounts.credentials.get(id)) {
            (Some(user), Some(hash)) => Ok(Some(AccountCredentials {
                user: user.clone(),
                password_hash: hash.clone(),
            })),
            _ => Err(StoreError::Corrupt(format!(
                "account {id} is missing a record"
            ))),
        }
    }

    async fn find_password_hash(&self, user_id: Uuid) -> Result<Option<String>, StoreError> {
        Ok(self.inner.read().await.credentials.get(&user_id).cloned())
    }

    async fn create_account(&self, account: NewAccount) -> Result<User, StoreError> {
        let mut accounts = self.inner.write().await;
        if accounts.usernames.contains_key(&account.username) {
            return Err(StoreError::UniqueViolation);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: account.username,
            role: account.role,
            created_at: now,
            updated_at: now,
        };

        accounts.usernames.insert(user.username.clone(), user.id);
        accounts.credentials.insert(user.id, account.password_hash);
        accounts.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let mut users: Vec<User> = self.inner.read().await.users.values().cloned().collect();
        users.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.username.cmp(&b.username))
        });
        Ok(users)
    }

    async fn update_username(
        &self,
        id: Uuid,
        username: &str,
    ) -> Result<Option<User>, StoreError> {
        let mut accounts = self.inner.write().await;
        let Some(current) = accounts.users.get(&id).map(|u| u.username.clone()) else {
            return Ok(None);
        };

        if current != username {
            if accounts.usernames.contains_key(username) {
                return Err(StoreError::UniqueViolation);
            }
            accounts.usernames.remove(&current);
            accounts.usernames.insert(username.to_string(), id);
        }

        let Some(user) = accounts.users.get_mut(&id) else {
            return Ok(None);
        };
        user.username = username.to_string();
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn update_password_hash(
        &self,
        user_id: Uuid,
        password_hash: &str,
    ) -> Result<bool, StoreError> {
        let mut accounts = self.inner.write().await;
        match accounts.credentials.get_mut(&user_id) {
            Some(hash) => {
                *hash = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_account(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut accounts = self.inner.write().await;
        let Some(user) = accounts.users.remove(&id) else {
            return Ok(false);
        };
        accounts.credentials.remove(&id);
        accounts.usernames.remove(&user.username);
        Ok(true)
    }
}
