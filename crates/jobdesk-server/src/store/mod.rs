//! Persistence seams.
//!
//! Handlers only see the [`JobStore`] and [`PerformanceStore`] traits. The
//! Postgres adapter is used in deployments; the memory adapter backs local
//! runs and tests.

pub mod memory;
pub mod models;
pub mod postgres;

pub use memory::MemoryStore;
pub use models::{AssessmentResult, Job, JobSummary, ReadinessLevel, ReadinessMetrics};
pub use postgres::PgStore;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// Errors returned by store adapters.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("database error")]
    Database(#[from] sqlx::Error),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

/// Reject histories containing a score that is not a finite number.
pub(crate) fn ensure_finite_scores(
    user_id: &str,
    results: &[AssessmentResult],
) -> Result<(), StoreError> {
    match results.iter().find(|r| !r.score.is_finite()) {
        Some(bad) => Err(StoreError::Corrupt(format!(
            "non-finite assessment score {} for user {user_id}",
            bad.score
        ))),
        None => Ok(()),
    }
}

/// Job postings.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Fetch a single job.
    async fn get(&self, id: Uuid) -> Result<Job, StoreError>;

    /// Set `is_active` on exactly one job and return the updated record.
    ///
    /// Either the whole update is applied or nothing changes.
    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<Job, StoreError>;

    /// Total and active job counts.
    async fn summary(&self) -> Result<JobSummary, StoreError>;
}

/// Assessment history and derived readiness metrics.
#[async_trait]
pub trait PerformanceStore: Send + Sync {
    /// All assessment attempts recorded for a user, oldest first.
    async fn assessment_results(&self, user_id: &str) -> Result<Vec<AssessmentResult>, StoreError>;

    /// Insert or replace the user's metrics.
    async fn save_metrics(&self, metrics: &ReadinessMetrics) -> Result<(), StoreError>;
}
