//! Persistence for snapfeed: sea-orm entities, repositories and schema migrations.
//!
//! Repositories wrap a shared [`DatabaseConnection`] and map store failures
//! onto [`AppError`]. Services in `snapfeed-core` stamp audit columns before
//! handing active models to a repository.

pub mod entities;
pub mod migrations;
pub mod repositories;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use migrations::Migrator;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use snapfeed_common::{AppError, Config, config::DatabaseConfig};
use std::time::Duration;
use tracing::log::LevelFilter;

/// Pool settings for a configured database.
#[must_use]
pub fn connect_options(config: &DatabaseConfig) -> ConnectOptions {
    let mut opt = ConnectOptions::new(&config.url);

    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections.min(config.max_connections))
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .sqlx_logging(true)
        .sqlx_logging_level(LevelFilter::Debug);

    opt
}

/// Open the connection pool.
pub async fn init(config: &Config) -> Result<DatabaseConnection, AppError> {
    Database::connect(connect_options(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}

/// Apply every pending migration.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), AppError> {
    let pending = Migrator::get_pending_migrations(db)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    if pending.is_empty() {
        tracing::debug!("Schema is up to date");
        return Ok(());
    }

    tracing::info!(count = pending.len(), "Applying migrations");
    Migrator::up(db, None)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}
