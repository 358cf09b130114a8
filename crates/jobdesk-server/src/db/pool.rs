//! Postgres pool and schema setup.

use crate::config::DatabaseConfig;
use anyhow::{Context, Result};
use sqlx::{
    migrate::Migrator,
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};
use std::str::FromStr;
use tracing::info;

/// Schema migrations for jobs, sessions and readiness metrics.
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Create a connection pool and check that the database answers.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let connect_options = PgConnectOptions::from_str(&config.url)
        .context("Invalid database URL")?;

    info!(
        host = connect_options.get_host(),
        database = connect_options.get_database().unwrap_or_default(),
        "Connecting to Postgres"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections.min(config.max_connections))
        .acquire_timeout(config.connect_timeout())
        .idle_timeout(Some(config.idle_timeout()))
        .connect_with(connect_options)
        .await
        .context("Failed to create database pool")?;

    verify_connection(&pool).await?;

    info!(max_connections = config.max_connections, "Database pool ready");
    Ok(pool)
}

/// Round-trip a trivial query.
pub async fn verify_connection(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .context("Database connection verification failed")?;
    Ok(())
}

/// Apply pending schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    MIGRATOR
        .run(pool)
        .await
        .context("Failed to run migrations")?;

    info!(available = MIGRATOR.iter().count(), "Migrations applied");
    Ok(())
}
