pub mod config;
pub mod error;
pub mod metrics;
pub mod model;
pub mod normalization;
pub mod reshape;
pub mod texts;
pub mod tracing;
pub mod translations;
pub mod words;

pub use config::{Environment, LingoConfig};
pub use error::{CreateStep, Rejection, WordError};
pub use texts::TextService;
pub use translations::TranslationService;
pub use words::WordService;

use anyhow::Context;
use lingo_db::PgStore;

/// Create the database if it is missing, open a pool for `config`, migrate
/// the schema and wrap the pool in a store.
pub async fn connect(config: &LingoConfig) -> anyhow::Result<PgStore> {
    lingo_db::ensure_database(&config.database_url).await?;
    let pool = lingo_db::create_pool(&config.database_url, config.database_max_connections)
        .await
        .context("failed to create database pool")?;
    lingo_db::run_migrations(&pool)
        .await
        .context("failed to migrate database")?;

    Ok(PgStore::new(pool))
}
