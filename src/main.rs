//! Vault Access Keeper — schema bootstrap entrypoint.
//!
//! Loads configuration, connects to PostgreSQL, and applies pending
//! migrations. The service crates are a library stack embedded by the API
//! layer; this binary only prepares the database they run against.

use vaultkeeper_core::config::AppConfig;
use vaultkeeper_core::error::AppError;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Migration failed: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let env = std::env::var("VAULTKEEPER_ENV").unwrap_or_else(|_| "development".to_string());
    let config = AppConfig::load(&env)?;

    vaultkeeper_core::logging::init(&config.logging);
    tracing::info!(env = %env, "Bootstrapping Vault Access Keeper database");

    let pool = vaultkeeper_database::DatabasePool::connect(&config.database).await?;
    vaultkeeper_database::migration::run_migrations(pool.pool()).await?;
    pool.health_check().await?;
    pool.close().await;

    tracing::info!("Database ready");
    Ok(())
}
