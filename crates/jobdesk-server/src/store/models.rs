//! Records read and written through the stores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// New inactive posting stamped with the current time.
    pub fn new(title: impl Into<String>, company: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            company: company.into(),
            location: None,
            description: None,
            is_active: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn active(mut self) -> Self {
        self.is_active = true;
        self
    }
}

/// Job counts shown on the admin landing page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    pub total: i64,
    pub active: i64,
}

/// One assessment attempt recorded for a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    /// Score in `0..=100`.
    pub score: f64,
    pub completed: bool,
}

impl AssessmentResult {
    pub fn completed(score: f64) -> Self {
        Self {
            score,
            completed: true,
        }
    }

    pub fn abandoned(score: f64) -> Self {
        Self {
            score,
            completed: false,
        }
    }
}

/// Coarse readiness band derived from the readiness score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReadinessLevel {
    NotReady,
    Developing,
    Ready,
}

impl ReadinessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotReady => "NOT_READY",
            Self::Developing => "DEVELOPING",
            Self::Ready => "READY",
        }
    }
}

/// Derived per-user readiness metrics.
///
/// Holds no timestamps, so recomputing over unchanged results yields an
/// equal value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessMetrics {
    pub user_id: String,
    pub assessments_taken: i64,
    pub assessments_completed: i64,
    pub average_score: f64,
    pub best_score: f64,
    pub completion_rate: f64,
    pub readiness_score: f64,
    pub readiness_level: ReadinessLevel,
}
