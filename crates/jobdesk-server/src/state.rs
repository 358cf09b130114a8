//! Shared application state.

use crate::{
    config::{ServerConfig, SessionStrategy, StorageBackend},
    db,
    middleware::auth::{DatabaseSessionResolver, JwtSessionResolver, SessionResolver},
    pages::PageRenderer,
    services::ReadinessService,
    store::{JobStore, MemoryStore, PerformanceStore, PgStore},
};
use anyhow::{bail, Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

/// State handed to every handler and guard.
///
/// Built once at startup; nothing in it is mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<dyn SessionResolver>,
    pub jobs: Arc<dyn JobStore>,
    pub readiness: ReadinessService,
    pub pages: Arc<PageRenderer>,
}

impl AppState {
    /// Build state from configuration, connecting to the database if needed.
    pub async fn new(config: &ServerConfig) -> Result<Self> {
        match config.database.backend {
            StorageBackend::Postgres => {
                let pool = db::create_pool(&config.database).await?;
                if config.database.run_migrations {
                    db::run_migrations(&pool).await?;
                }

                let sessions: Arc<dyn SessionResolver> = match config.auth.strategy {
                    SessionStrategy::Jwt => Arc::new(JwtSessionResolver::new(&config.auth)),
                    SessionStrategy::Database => {
                        Arc::new(DatabaseSessionResolver::new(pool.clone(), &config.auth))
                    }
                };

                let store = Arc::new(PgStore::new(pool));
                info!(strategy = ?config.auth.strategy, "Using Postgres store");
                Self::from_parts(sessions, store.clone(), store)
            }
            StorageBackend::Memory => {
                if config.auth.strategy == SessionStrategy::Database {
                    bail!("database session strategy requires the postgres backend");
                }
                warn!("Using in-memory store; data will not survive a restart");
                let store = Arc::new(MemoryStore::new());
                Self::from_parts(
                    Arc::new(JwtSessionResolver::new(&config.auth)),
                    store.clone(),
                    store,
                )
            }
        }
    }

    /// Assemble state from already-built collaborators.
    pub fn from_parts(
        sessions: Arc<dyn SessionResolver>,
        jobs: Arc<dyn JobStore>,
        performance: Arc<dyn PerformanceStore>,
    ) -> Result<Self> {
        let pages = PageRenderer::new().context("Failed to compile page templates")?;

        Ok(Self {
            sessions,
            jobs,
            readiness: ReadinessService::new(performance),
            pages: Arc::new(pages),
        })
    }
}
