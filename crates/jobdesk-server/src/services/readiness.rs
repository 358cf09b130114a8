//! Readiness ("performance") metrics.

use crate::store::{
    AssessmentResult, PerformanceStore, ReadinessLevel, ReadinessMetrics, StoreError,
};
use std::sync::Arc;
use tracing::info;

const AVERAGE_WEIGHT: f64 = 0.7;
const COMPLETION_WEIGHT: f64 = 30.0;
const READY_THRESHOLD: f64 = 75.0;
const DEVELOPING_THRESHOLD: f64 = 50.0;

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Derive readiness metrics from a user's assessment history.
///
/// Pure and deterministic: equal inputs give equal metrics.
pub fn compute_readiness(user_id: &str, results: &[AssessmentResult]) -> ReadinessMetrics {
    let taken = results.len();
    let completed: Vec<f64> = results
        .iter()
        .filter(|r| r.completed)
        .map(|r| r.score.clamp(0.0, 100.0))
        .collect();

    let average_score = if completed.is_empty() {
        0.0
    } else {
        completed.iter().sum::<f64>() / completed.len() as f64
    };
    let best_score = completed.iter().copied().fold(0.0, f64::max);
    let completion_rate = if taken == 0 {
        0.0
    } else {
        completed.len() as f64 / taken as f64
    };

    let readiness_score =
        (AVERAGE_WEIGHT * average_score + COMPLETION_WEIGHT * completion_rate).clamp(0.0, 100.0);
    let readiness_score = round_to(readiness_score, 2);

    let readiness_level = if readiness_score >= READY_THRESHOLD {
        ReadinessLevel::Ready
    } else if readiness_score >= DEVELOPING_THRESHOLD {
        ReadinessLevel::Developing
    } else {
        ReadinessLevel::NotReady
    };

    ReadinessMetrics {
        user_id: user_id.to_string(),
        assessments_taken: taken as i64,
        assessments_completed: completed.len() as i64,
        average_score: round_to(average_score, 2),
        best_score,
        completion_rate: round_to(completion_rate, 4),
        readiness_score,
        readiness_level,
    }
}

/// Recomputes and stores readiness metrics.
#[derive(Clone)]
pub struct ReadinessService {
    store: Arc<dyn PerformanceStore>,
}

impl ReadinessService {
    pub fn new(store: Arc<dyn PerformanceStore>) -> Self {
        Self { store }
    }

    /// Recompute the metrics for `user_id` and persist them.
    ///
    /// `user_id` must come from the authorized identity, never from the
    /// request body or query.
    pub async fn recalculate(&self, user_id: &str) -> Result<ReadinessMetrics, StoreError> {
        let results = self.store.assessment_results(user_id).await?;
        let metrics = compute_readiness(user_id, &results);
        self.store.save_metrics(&metrics).await?;

        info!(
            user_id = %user_id,
            readiness_score = metrics.readiness_score,
            level = metrics.readiness_level.as_str(),
            "Readiness recalculated"
        );
        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_no_history() {
        let metrics = compute_readiness("u1", &[]);
        assert_eq!(metrics.assessments_taken, 0);
        assert_eq!(metrics.average_score, 0.0);
        assert_eq!(metrics.completion_rate, 0.0);
        assert_eq!(metrics.readiness_score, 0.0);
        assert_eq!(metrics.readiness_level, ReadinessLevel::NotReady);
    }

    #[test]
    fn test_mixed_history() {
        let results = vec![
            AssessmentResult::completed(80.0),
            AssessmentResult::completed(90.0),
            AssessmentResult::abandoned(20.0),
            AssessmentResult::completed(100.0),
        ];
        let metrics = compute_readiness("u1", &results);

        assert_eq!(metrics.assessments_taken, 4);
        assert_eq!(metrics.assessments_completed, 3);
        assert_eq!(metrics.average_score, 90.0);
        assert_eq!(metrics.best_score, 100.0);
        assert_eq!(metrics.completion_rate, 0.75);
        // 0.7 * 90 + 30 * 0.75
        assert_eq!(metrics.readiness_score, 85.5);
        assert_eq!(metrics.readiness_level, ReadinessLevel::Ready);
    }

    #[test]
    fn test_developing_band() {
        let results = vec![AssessmentResult::completed(60.0), AssessmentResult::abandoned(0.0)];
        let metrics = compute_readiness("u1", &results);
        // 0.7 * 60 + 30 * 0.5 = 57
        assert_eq!(metrics.readiness_score, 57.0);
        assert_eq!(metrics.readiness_level, ReadinessLevel::Developing);
    }

    #[test]
    fn test_scores_clamped() {
        let results = vec![AssessmentResult::completed(250.0), AssessmentResult::completed(-10.0)];
        let metrics = compute_readiness("u1", &results);
        assert_eq!(metrics.best_score, 100.0);
        assert_eq!(metrics.average_score, 50.0);
    }

    #[tokio::test]
    async fn test_recalculate_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        store.record_assessment("u1", AssessmentResult::completed(72.5));
        store.record_assessment("u1", AssessmentResult::abandoned(10.0));
        let service = ReadinessService::new(store.clone());

        let first = service.recalculate("u1").await.unwrap();
        let second = service.recalculate("u1").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.metrics_for("u1"), Some(second));
    }

    #[tokio::test]
    async fn test_recalculate_scoped_to_user() {
        let store = Arc::new(MemoryStore::new());
        store.record_assessment("u1", AssessmentResult::completed(100.0));
        store.record_assessment("u2", AssessmentResult::completed(10.0));
        let service = ReadinessService::new(store.clone());

        let metrics = service.recalculate("u2").await.unwrap();
        assert_eq!(metrics.best_score, 10.0);
        assert!(store.metrics_for("u1").is_none());
    }
}
