//! Server-rendered page routes.
//!
//! Everything under `/admin` passes the admin layout guard first (fallback
//! `/`). Pages that demand more carry their own guard (fallback `/admin`).

use crate::{
    middleware::{Capability, GuardLayer},
    pages::{self, ADMIN_LANDING, SITE_ROOT},
    state::AppState,
};
use axum::{routing::get, Router};

/// Create the admin area router, to be nested at `/admin`.
pub fn admin_router(state: &AppState) -> Router<AppState> {
    let page_guard =
        |capability| GuardLayer::page(state.sessions.clone(), capability, ADMIN_LANDING);

    Router::new()
        .route("/", get(pages::admin_dashboard))
        .route(
            "/announcements",
            get(pages::announcements).route_layer(page_guard(Capability::AdminOrSuper)),
        )
        .route(
            "/cache-clear",
            get(pages::cache_clear).route_layer(page_guard(Capability::SuperOnly)),
        )
        .route(
            "/jobs/new",
            get(pages::admin_new_job).route_layer(page_guard(Capability::AdminOrSuper)),
        )
        .route(
            "/users/new",
            get(pages::admin_new_user).route_layer(page_guard(Capability::AdminOrSuper)),
        )
        .layer(GuardLayer::page(
            state.sessions.clone(),
            Capability::AdminOrSuper,
            SITE_ROOT,
        ))
}

/// Create the public and authenticated site pages.
pub fn site_router(state: &AppState) -> Router<AppState> {
    Router::new().route("/", get(pages::home)).route(
        "/jobs/new",
        get(pages::job_new).route_layer(GuardLayer::page(
            state.sessions.clone(),
            Capability::Authenticated,
            SITE_ROOT,
        )),
    )
}
