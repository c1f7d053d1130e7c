use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use estore_cli::admin::create_admin;
use estore_cli::seeder::{self, SEED_PASSWORD, SeedConfig};
use estore_config::PasswordConfig;
use estore_core::PasswordHasher;
use estore_db::{PgAccountStore, init_db_pool};

#[derive(Parser)]
#[command(name = "estore-cli")]
#[command(about = "estore CLI - Administrative tools for estore", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new administrator account
    CreateAdmin {
        /// Username of the admin
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with fake users
    SeedUsers {
        /// Number of regular users to create
        #[arg(short = 'c', long, default_value = "50")]
        count: usize,

        /// Number of admins to create
        #[arg(long, default_value = "0")]
        admins: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();

    let pool = init_db_pool().await?;
    run_migrations(&pool).await?;
    let store = PgAccountStore::new(pool);

    let password_config = PasswordConfig::from_env().context("Invalid password configuration")?;
    let hasher = PasswordHasher::new(password_config.bcrypt_cost)?;

    match cli.command {
        Commands::CreateAdmin { username, password } => {
            let username = match username {
                Some(username) => username,
                None => Input::new()
                    .with_prompt("Username")
                    .interact_text()
                    .context("Failed to read username")?,
            };

            let password = match password {
                Some(password) => password,
                None => Password::new()
                    .with_prompt("Password")
                    .with_confirmation("Confirm password", "Passwords don't match")
                    .interact()
                    .context("Failed to read password")?,
            };

            let admin = create_admin(&store, &hasher, username, password).await?;
            println!("\n✅ Admin created successfully!");
            println!("   Username: {}", admin.username);
            println!("   ID: {}", admin.id);
        }
        Commands::SeedUsers { count, admins } => {
            let config = SeedConfig::new(count).with_admins(admins);
            seeder::seed_users(&store, &hasher, config).await?;
            println!("   Password for every seeded account: {SEED_PASSWORD}");
        }
    }

    Ok(())
}

async fn run_migrations(pool: &estore_db::PgPool) -> anyhow::Result<()> {
    estore::state::MIGRATOR
        .run(pool)
        .await
        .context("Failed to run database migrations")
}
