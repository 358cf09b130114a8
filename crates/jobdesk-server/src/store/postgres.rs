//! Postgres store adapter.

use super::{
    ensure_finite_scores, AssessmentResult, Job, JobStore, JobSummary, PerformanceStore,
    ReadinessMetrics, StoreError,
};
use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::debug;
use uuid::Uuid;

const JOB_COLUMNS: &str =
    "id, title, company, location, description, is_active, created_at, updated_at";

/// Store backed by a Postgres pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgStore {
    async fn get(&self, id: Uuid) -> Result<Job, StoreError> {
        sqlx::query_as::<_, Job>(&format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("Job"))
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<Job, StoreError> {
        // Single statement, so the row is either fully updated or untouched.
        let job = sqlx::query_as::<_, Job>(&format!(
            "UPDATE jobs SET is_active = $2, updated_at = NOW() WHERE id = $1 RETURNING {JOB_COLUMNS}"
        ))
        .bind(id)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("Job"))?;

        debug!(job_id = %job.id, is_active = job.is_active, "Job active flag updated");
        Ok(job)
    }

    async fn summary(&self) -> Result<JobSummary, StoreError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS total, COUNT(*) FILTER (WHERE is_active) AS active FROM jobs",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(JobSummary {
            total: row.try_get("total")?,
            active: row.try_get("active")?,
        })
    }
}

#[async_trait]
impl PerformanceStore for PgStore {
    async fn assessment_results(&self, user_id: &str) -> Result<Vec<AssessmentResult>, StoreError> {
        let results = sqlx::query_as::<_, AssessmentResult>(
            "SELECT score, completed FROM assessment_results WHERE user_id = $1 ORDER BY taken_at, id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        ensure_finite_scores(user_id, &results)?;
        Ok(results)
    }

    async fn save_metrics(&self, metrics: &ReadinessMetrics) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO readiness_metrics (
                user_id, assessments_taken, assessments_completed, average_score,
                best_score, completion_rate, readiness_score, readiness_level, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())
            ON CONFLICT (user_id) DO UPDATE SET
                assessments_taken = EXCLUDED.assessments_taken,
                assessments_completed = EXCLUDED.assessments_completed,
                average_score = EXCLUDED.average_score,
                best_score = EXCLUDED.best_score,
                completion_rate = EXCLUDED.completion_rate,
                readiness_score = EXCLUDED.readiness_score,
                readiness_level = EXCLUDED.readiness_level,
                updated_at = NOW()
            "#,
        )
        .bind(&metrics.user_id)
        .bind(metrics.assessments_taken)
        .bind(metrics.assessments_completed)
        .bind(metrics.average_score)
        .bind(metrics.best_score)
        .bind(metrics.completion_rate)
        .bind(metrics.readiness_score)
        .bind(metrics.readiness_level.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
