//! Configuration validation.

use super::types::{ServerConfig, SessionStrategy, StorageBackend};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid session secret: must be at least 32 characters")]
    InvalidSessionSecret,

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Database session strategy requires the postgres backend")]
    SessionStoreUnavailable,

    #[error("Invalid port: {0}")]
    InvalidPort(u16),

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}")]
    InvalidLogFormat(String),
}

/// Validate server configuration.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.auth.strategy == SessionStrategy::Jwt && config.auth.secret.len() < 32 {
        errors.push(ConfigError::InvalidSessionSecret);
    }

    if config.database.backend == StorageBackend::Postgres && config.database.url.is_empty() {
        errors.push(ConfigError::InvalidDatabaseUrl);
    }

    if config.auth.strategy == SessionStrategy::Database
        && config.database.backend != StorageBackend::Postgres
    {
        errors.push(ConfigError::SessionStoreUnavailable);
    }

    if config.server.port == 0 {
        errors.push(ConfigError::InvalidPort(0));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.logging.level.to_lowercase().as_str()) {
        errors.push(ConfigError::InvalidLogLevel(config.logging.level.clone()));
    }

    if !matches!(config.logging.format.as_str(), "pretty" | "json") {
        errors.push(ConfigError::InvalidLogFormat(config.logging.format.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
