//! Seeds the initial ADMIN account. Refuses to touch an existing user.
//!
//! ```sh
//! SEED_ADMIN_EMAIL=admin@example.com SEED_ADMIN_PASSWORD=... cargo run --bin seed-admin
//! ```

use anyhow::{Context, bail};

use quill_core::domain::{User, UserRole};
use quill_core::ports::{PasswordService, UserRepository};
use quill_infra::Argon2PasswordService;
use quill_infra::database::{DatabaseConfig, PostgresUserRepository, connect};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt().with_env_filter("info").init();

    let email =
        std::env::var("SEED_ADMIN_EMAIL").unwrap_or_else(|_| "admin@quill.dev".to_string());
    let name = std::env::var("SEED_ADMIN_NAME").unwrap_or_else(|_| "Admin".to_string());
    let password =
        std::env::var("SEED_ADMIN_PASSWORD").context("SEED_ADMIN_PASSWORD must be set")?;

    let db_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let db = connect(&DatabaseConfig {
        url: db_url,
        max_connections: 5,
        min_connections: 1,
    })
    .await?;
    let users = PostgresUserRepository::new(db);

    tracing::info!(admin_email = %email, "Seeding admin account");

    if users.find_by_email(&email).await?.is_some() {
        bail!("User already exists");
    }

    let password_hash = Argon2PasswordService::new().hash(&password)?;

    let mut admin = User::new(name, email, password_hash, None);
    admin.role = UserRole::Admin;
    admin.email_verified = true;

    let saved = users.insert(admin).await?;
    tracing::info!(admin_id = %saved.id, "Admin account created and verified");

    Ok(())
}
