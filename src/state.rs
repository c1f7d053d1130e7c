use std::sync::Arc;

use anyhow::Context;
use estore_auth::{SystemClock, TokenIssuer};
use estore_config::{CorsConfig, JwtConfig, PasswordConfig};
use estore_core::PasswordHasher;
use estore_db::{AccountStore, PgAccountStore, init_db_pool};
use sqlx::migrate::Migrator;
use tracing::info;

/// Schema migrations embedded from `migrations/`.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Shared, immutable after startup.
#[derive(Clone, Debug)]
pub struct AppState {
    pub store: Arc<dyn AccountStore>,
    pub tokens: Arc<TokenIssuer>,
    pub hasher: PasswordHasher,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn new(
        store: Arc<dyn AccountStore>,
        tokens: Arc<TokenIssuer>,
        hasher: PasswordHasher,
        cors_config: CorsConfig,
    ) -> Self {
        Self {
            store,
            tokens,
            hasher,
            cors_config,
        }
    }
}

/// Reads configuration, connects to Postgres and applies pending migrations.
pub async fn init_app_state() -> anyhow::Result<AppState> {
    let jwt_config = JwtConfig::from_env().context("Invalid JWT configuration")?;
    let password_config = PasswordConfig::from_env().context("Invalid password configuration")?;

    let pool = init_db_pool().await?;
    MIGRATOR
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    info!("Database migrations applied");

    let hasher = PasswordHasher::new(password_config.bcrypt_cost)?;

    Ok(AppState::new(
        Arc::new(PgAccountStore::new(pool)),
        Arc::new(TokenIssuer::new(&jwt_config, Arc::new(SystemClock))),
        hasher,
        CorsConfig::from_env(),
    ))
}
