//! JSON API routes.
//!
//! Every route here sits behind an API guard: denials are answered with
//! `401 {"error":"Unauthorized"}` before a handler runs.

use crate::{
    error::{ApiError, ApiResult, ErrorContext},
    middleware::{Auth, Capability, GuardLayer},
    state::AppState,
    store::{Job, ReadinessMetrics},
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    routing::{patch, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

/// Create the API router.
pub fn router(state: &AppState) -> Router<AppState> {
    let guard = |capability| GuardLayer::api(state.sessions.clone(), capability);

    Router::new()
        .route(
            "/admin/jobs/:id/toggle",
            patch(toggle_job).route_layer(guard(Capability::AdminOrSuper)),
        )
        .route(
            "/performance/calculate",
            post(calculate_readiness).route_layer(guard(Capability::Authenticated)),
        )
}

/// Body of the job toggle request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleJobRequest {
    pub is_active: bool,
}

/// Set a job's active flag.
pub async fn toggle_job(
    State(state): State<AppState>,
    Auth(identity): Auth,
    id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<ToggleJobRequest>, JsonRejection>,
) -> ApiResult<Json<Job>> {
    let Path(id) = id.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let Json(request) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let job = state.jobs.set_active(id, request.is_active).await?;

    info!(job_id = %job.id, is_active = job.is_active, user_id = %identity.id, "Job toggled");
    Ok(Json(job))
}

/// Recompute the caller's readiness metrics.
///
/// The user is always the authenticated caller; the route takes no input.
pub async fn calculate_readiness(
    State(state): State<AppState>,
    Auth(identity): Auth,
) -> ApiResult<Json<ReadinessMetrics>> {
    let metrics = state
        .readiness
        .recalculate(&identity.id)
        .await
        .context("Failed to calculate readiness metrics")?;

    Ok(Json(metrics))
}
