//! Database layer for moddesk.
//!
//! - [`entities`]: sea-orm models for `users`, `posts`, `tags`, `post_tags` and `reports`
//! - [`query`]: 1-indexed pagination and the row range it maps to
//! - [`repositories`]: list and update operations backing the admin service

pub mod entities;
pub mod query;
pub mod repositories;
pub mod test_utils;

use moddesk_common::{AppError, Config};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::log::LevelFilter;

/// Connection options derived from the `database` config section.
#[must_use]
pub fn connect_options(config: &Config) -> ConnectOptions {
    let mut opt = ConnectOptions::new(&config.database.url);

    opt.max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect_timeout(Duration::from_secs(config.database.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(config.database.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(true)
        .sqlx_logging_level(LevelFilter::Debug);

    opt
}

/// Initialize database connection.
pub async fn init(config: &Config) -> Result<DatabaseConnection, AppError> {
    Database::connect(connect_options(config))
        .await
        .map_err(|e| AppError::Internal(format!("database connection failed: {e}")))
}
