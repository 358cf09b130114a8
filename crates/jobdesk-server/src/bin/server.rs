//! Jobdesk Server Binary

use anyhow::{bail, Result};
use jobdesk_server::{
    config::{load_config, validate_config, LoggingConfig},
    Server,
};
use tracing::{error, info};

#[cfg(feature = "tracing")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[cfg(feature = "tracing")]
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().pretty()).init();
    }
}

#[cfg(not(feature = "tracing"))]
fn init_tracing(_logging: &LoggingConfig) {}

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config()?;

    init_tracing(&config.logging);

    if let Err(errors) = validate_config(&config) {
        for err in &errors {
            error!(error = %err, "Invalid configuration");
        }
        bail!("configuration has {} error(s)", errors.len());
    }

    info!(
        "Starting Jobdesk Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Create and run server
    let server = Server::new(config).await?;
    server.run().await?;

    info!("Server shutdown complete");
    Ok(())
}
