//! Configuration loading.
//!
//! Sources, lowest precedence first:
//!
//! 1. the embedded `defaults.toml`
//! 2. the TOML file named by `CONFIG_PATH`, when set
//! 3. `JOBDESK__SECTION__KEY` environment variables, including those from `.env`

use super::types::ServerConfig;
use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "JOBDESK";
const CONFIG_PATH_VAR: &str = "CONFIG_PATH";

/// Load the server configuration for this process.
pub fn load_config() -> Result<ServerConfig> {
    // A missing .env is normal outside development.
    let _ = dotenvy::dotenv();

    let config_path = std::env::var_os(CONFIG_PATH_VAR).map(PathBuf::from);
    build(config_path.as_deref(), environment())
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

fn build(config_path: Option<&Path>, env: Environment) -> Result<ServerConfig> {
    let mut builder = Config::builder().add_source(File::from_str(
        include_str!("defaults.toml"),
        FileFormat::Toml,
    ));

    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).format(FileFormat::Toml));
    }

    builder
        .add_source(env)
        .build()
        .and_then(Config::try_deserialize::<ServerConfig>)
        .with_context(|| match config_path {
            Some(path) => format!("Invalid configuration (file {})", path.display()),
            None => "Invalid configuration".to_string(),
        })
}
