//! # estore CLI
//!
//! Administrative tooling for estore: admin account creation and fake user
//! seeding for development databases.
//!
//! Both go through the same atomic account-creation path as the HTTP API.
//!
//! ```ignore
//! use estore_cli::seeder::{SeedConfig, seed_users};
//!
//! let report = seed_users(&store, &hasher, SeedConfig::new(50)).await?;
//! ```

pub mod admin;
pub mod seeder;
