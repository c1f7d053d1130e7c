use async_trait::async_trait;
use chrono::{DateTime, Utc};
use estore_core::Role;
use estore_models::users::User;
use sqlx::{FromRow, PgPool};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::store::{AccountCredentials, AccountStore, NewAccount, StoreError};

const USER_COLUMNS: &str = "id, username, role, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .role
            .parse()
            .map_err(|e| StoreError::Corrupt(format!("user {}: {e}", row.id)))?;

        Ok(User {
            id: row.id,
            username: row.username,
            role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

fn map_write_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
    {
        return StoreError::UniqueViolation;
    }
    StoreError::Database(err)
}

#[async_trait]
impl AccountStore for PgAccountStore {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<AccountCredentials>, StoreError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT u.id, u.username, u.role, u.created_at, u.updated_at, c.password_hash
            FROM users u
            INNER JOIN user_credentials c ON c.user_id = u.id
            WHERE u.username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| {
            Ok(AccountCredentials {
                user: User::try_from(row.user)?,
                password_hash: row.password_hash,
            })
        })
        .transpose()
    }

    #[instrument(skip(self))]
    async fn find_password_hash(&self, user_id: Uuid) -> Result<Option<String>, StoreError> {
        let hash = sqlx::query_scalar::<_, String>(
            "SELECT password_hash FROM user_credentials WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(hash)
    }

    #[instrument(skip(self, account), fields(user.username = %account.username, user.role = %account.role))]
    async fn create_account(&self, account: NewAccount) -> Result<User, StoreError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO users (id, username, role) VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&account.username)
            .bind(account.role.as_str())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                let err = map_write_error(e);
                if matches!(err, StoreError::UniqueViolation) {
                    warn!("Username already taken");
                }
                err
            })?;

        sqlx::query("INSERT INTO user_credentials (user_id, password_hash) VALUES ($1, $2)")
            .bind(row.id)
            .bind(&account.password_hash)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(user.id = %row.id, "Account committed");
        User::try_from(row)
    }

    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at, username");
        sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    #[instrument(skip(self))]
    async fn update_username(
        &self,
        id: Uuid,
        username: &str,
    ) -> Result<Option<User>, StoreError> {
        let sql = format!(
            "UPDATE users SET username = $2, updated_at = NOW() WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)?
            .map(User::try_from)
            .transpose()
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password_hash(
        &self,
        user_id: Uuid,
        password_hash: &str,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE user_credentials SET password_hash = $2, updated_at = NOW() WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete_account(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM user_credentials WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }
}
