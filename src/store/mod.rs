//! PostgreSQL repositories.
//!
//! Read paths live here; every mutation of room inventory goes through the
//! booking lifecycle manager instead, so no store exposes a way to change
//! `bed_remaining` directly.

pub mod accounts;
pub mod bookings;
pub mod expenses;
pub mod maintenance;
pub mod rooms;
pub mod sessions;

use crate::config::DatabaseConfig;
use crate::error::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// Build the connection pool from configuration.
///
/// # Errors
///
/// Returns [`crate::error::Error::Database`] if the pool cannot connect.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout))
        .idle_timeout(Duration::from_secs(config.idle_timeout))
        .connect(&config.url)
        .await?;
    Ok(pool)
}

/// Run database migrations.
///
/// # Errors
///
/// Returns [`crate::error::Error::Database`] if a migration fails.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| crate::error::Error::Database(format!("migration failed: {e}")))?;
    Ok(())
}
