//! # estore db
//!
//! Database pool and account persistence for the estore API.
//!
//! Accounts are stored as two records, an identity row in `users` and a
//! credential row in `user_credentials`. [`AccountStore`] is the only way
//! the service touches them; every implementation creates and deletes the
//! pair as one unit.
//!
//! # Example
//!
//! ```ignore
//! use estore_db::{PgAccountStore, init_db_pool};
//!
//! let pool = init_db_pool().await?;
//! let store = PgAccountStore::new(pool);
//! ```

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod postgres;
pub mod store;

use std::env;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryAccountStore;
pub use postgres::PgAccountStore;
pub use store::{AccountCredentials, AccountStore, NewAccount, StoreError};

pub use sqlx::PgPool;

/// Connects to the database named by `DATABASE_URL`.
pub async fn init_db_pool() -> anyhow::Result<PgPool> {
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    connect(&database_url).await
}

pub async fn connect(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;

    info!("Database connection pool established");
    Ok(pool)
}
