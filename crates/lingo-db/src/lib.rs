pub mod error;
pub mod models;
pub mod repositories;
pub mod store;

pub use error::StoreError;
pub use store::{PgStore, PgUnit, WordStore, WordUnit};

use anyhow::Context;
use sqlx::{PgPool, Postgres, migrate::MigrateDatabase, postgres::PgPoolOptions};

/// Create a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .context("failed to connect to database")?;

    Ok(pool)
}

/// Create the database named in `database_url` if it does not exist yet.
///
/// Must run before [`create_pool`]: the pool cannot connect to a missing
/// database.
pub async fn ensure_database(database_url: &str) -> anyhow::Result<()> {
    let exists = Postgres::database_exists(database_url)
        .await
        .context("failed to check whether the database exists")?;
    if !exists {
        if let Err(err) = Postgres::create_database(database_url).await {
            // Lost a race with a concurrent creator
            if !Postgres::database_exists(database_url).await? {
                return Err(err).context("failed to create database");
            }
        } else {
            tracing::info!("created missing database");
        }
    }

    Ok(())
}

/// Run the migrations bundled from this crate's `migrations/` folder.
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!().run(pool).await?;
    Ok(())
}
