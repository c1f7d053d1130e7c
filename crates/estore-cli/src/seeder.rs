//! Fake user seeding for development databases.

use std::time::Instant;

use estore::modules::auth::service::hash_password;
use estore_core::{PasswordHasher, Role};
use estore_db::{AccountStore, NewAccount, StoreError};
use fake::Fake;
use fake::faker::internet::en::Username;
use rayon::prelude::*;

/// Every seeded account logs in with this password.
pub const SEED_PASSWORD: &str = "password123";

const MAX_USERNAME_LEN: usize = 100;

#[derive(Debug, Clone, Copy)]
pub struct SeedConfig {
    pub users: usize,
    pub admins: usize,
}

impl SeedConfig {
    pub fn new(users: usize) -> Self {
        Self { users, admins: 0 }
    }

    pub fn with_admins(mut self, admins: usize) -> Self {
        self.admins = admins;
        self
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub created: usize,
    /// Generated usernames that were already taken.
    pub skipped: usize,
}

/// Generates `count` distinct usernames. The index suffix keeps them unique
/// within one run.
pub fn generate_usernames(count: usize) -> Vec<String> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let base: String = Username().fake();
            seeded_username(&base, idx)
        })
        .collect()
}

/// Shortens `base`, never the suffix, to fit the username column.
fn seeded_username(base: &str, idx: usize) -> String {
    let suffix = format!("_{idx}");
    let base: String = base
        .to_lowercase()
        .chars()
        .take(MAX_USERNAME_LEN.saturating_sub(suffix.len()))
        .collect();
    format!("{base}{suffix}")
}

/// Creates `config.users` regular users and `config.admins` admins, each
/// through the atomic account-creation path.
pub async fn seed_users(
    store: &dyn AccountStore,
    hasher: &PasswordHasher,
    config: SeedConfig,
) -> anyhow::Result<SeedReport> {
    let start_time = Instant::now();
    let total = config.users + config.admins;
    println!(
        "👥 Seeding {} users ({} admins, {} regular)...",
        total, config.admins, config.users
    );

    let password_hash = hash_password(hasher, SEED_PASSWORD.to_string()).await?;
    let usernames = generate_usernames(total);

    let mut report = SeedReport::default();
    for (idx, username) in usernames.into_iter().enumerate() {
        let role = if idx < config.admins {
            Role::Admin
        } else {
            Role::RegularUser
        };

        match store
            .create_account(NewAccount {
                username,
                password_hash: password_hash.clone(),
                role,
            })
            .await
        {
            Ok(_) => report.created += 1,
            Err(StoreError::UniqueViolation) => report.skipped += 1,
            Err(e) => return Err(e.into()),
        }
    }

    println!(
        "✅ Created {} users ({} skipped) in {:.2}s",
        report.created,
        report.skipped,
        start_time.elapsed().as_secs_f64()
    );
    Ok(report)
}
