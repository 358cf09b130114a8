//! In-process store adapter.

use super::{
    ensure_finite_scores, AssessmentResult, Job, JobStore, JobSummary, PerformanceStore,
    ReadinessMetrics, StoreError,
};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

/// Store backed by in-memory maps.
#[derive(Default)]
pub struct MemoryStore {
    jobs: RwLock<HashMap<Uuid, Job>>,
    results: RwLock<HashMap<String, Vec<AssessmentResult>>>,
    metrics: RwLock<HashMap<String, ReadinessMetrics>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a job.
    pub fn insert_job(&self, job: Job) {
        self.jobs.write().insert(job.id, job);
    }

    /// Append an assessment attempt for a user.
    pub fn record_assessment(&self, user_id: &str, result: AssessmentResult) {
        self.results
            .write()
            .entry(user_id.to_string())
            .or_default()
            .push(result);
    }

    /// Last metrics saved for a user.
    pub fn metrics_for(&self, user_id: &str) -> Option<ReadinessMetrics> {
        self.metrics.read().get(user_id).cloned()
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn get(&self, id: Uuid) -> Result<Job, StoreError> {
        self.jobs
            .read()
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound("Job"))
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<Job, StoreError> {
        let mut jobs = self.jobs.write();
        let job = jobs.get_mut(&id).ok_or(StoreError::NotFound("Job"))?;
        job.is_active = is_active;
        job.updated_at = Utc::now();
        Ok(job.clone())
    }

    async fn summary(&self) -> Result<JobSummary, StoreError> {
        let jobs = self.jobs.read();
        Ok(JobSummary {
            total: jobs.len() as i64,
            active: jobs.values().filter(|job| job.is_active).count() as i64,
        })
    }
}

#[async_trait]
impl PerformanceStore for MemoryStore {
    async fn assessment_results(&self, user_id: &str) -> Result<Vec<AssessmentResult>, StoreError> {
        let results = self.results.read().get(user_id).cloned().unwrap_or_default();
        ensure_finite_scores(user_id, &results)?;
        Ok(results)
    }

    async fn save_metrics(&self, metrics: &ReadinessMetrics) -> Result<(), StoreError> {
        self.metrics
            .write()
            .insert(metrics.user_id.clone(), metrics.clone());
        Ok(())
    }
}
