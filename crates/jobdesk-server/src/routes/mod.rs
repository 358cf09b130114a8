//! Route configuration for the Jobdesk server.

mod api;
mod health;
mod pages;

pub use api::{calculate_readiness, toggle_job, ToggleJobRequest};

use crate::{
    error::{error_response, panic_response, ApiError},
    state::AppState,
};
use axum::{
    error_handling::HandleErrorLayer,
    http::{HeaderName, StatusCode},
    response::Response,
    BoxError, Router,
};
use std::time::Duration;
use tower::{
    timeout::{error::Elapsed, TimeoutLayer},
    ServiceBuilder,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Create the main application router.
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    // Common middleware stack applied to all routes
    let common_middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(HandleErrorLayer::new(handle_middleware_error))
        .layer(TimeoutLayer::new(request_timeout));

    Router::new()
        .nest("/api", api::router(&state))
        .nest("/admin", pages::admin_router(&state))
        .merge(pages::site_router(&state))
        .merge(health::router())
        .fallback(fallback_handler)
        .layer(common_middleware)
        .with_state(state)
}

/// Errors raised by the middleware stack surface as the generic 500.
async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        ApiError::Internal(anyhow::anyhow!("request timed out"))
    } else {
        ApiError::Internal(anyhow::anyhow!("middleware error: {err}"))
    }
}

async fn fallback_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}
