//! Server-rendered pages.
//!
//! Handlers here assume their guards already ran: the admin layout guard for
//! everything under `/admin`, plus a per-page guard where the page demands
//! more. They read the viewer through [`Auth`].

pub mod nav;
pub mod renderer;

pub use nav::{sidebar_links, NavLink, ADMIN_LANDING, SITE_ROOT};
pub use renderer::PageRenderer;

use crate::{
    error::{ApiResult, ErrorContext},
    middleware::auth::{Auth, Role},
    state::AppState,
};
use axum::{
    extract::State,
    response::{Html, Redirect},
};
use serde_json::json;

/// Generic job-creation page the admin shortcut forwards to.
pub const JOB_CREATION_PAGE: &str = "/jobs/new";

const ANNOUNCEMENT_AUDIENCES: [&str; 3] = ["Everyone", "Job seekers", "Employers"];
const CACHES: [&str; 3] = ["Job listings", "Company profiles", "Rendered pages"];

pub async fn home(State(state): State<AppState>) -> ApiResult<Html<String>> {
    let html = state
        .pages
        .render("home", &json!({}))
        .context("Failed to render home page")?;
    Ok(Html(html))
}

pub async fn admin_dashboard(
    State(state): State<AppState>,
    Auth(viewer): Auth,
) -> ApiResult<Html<String>> {
    let summary = state.jobs.summary().await?;
    let html = state
        .pages
        .render_admin(
            &viewer,
            ADMIN_LANDING,
            "Dashboard",
            "dashboard",
            &json!({ "viewer_name": viewer.name, "jobs": summary }),
        )
        .context("Failed to render admin dashboard")?;
    Ok(Html(html))
}

pub async fn announcements(
    State(state): State<AppState>,
    Auth(viewer): Auth,
) -> ApiResult<Html<String>> {
    let html = state
        .pages
        .render_admin(
            &viewer,
            "/admin/announcements",
            "Announcements",
            "announcements",
            &json!({ "audiences": ANNOUNCEMENT_AUDIENCES }),
        )
        .context("Failed to render announcements page")?;
    Ok(Html(html))
}

pub async fn cache_clear(
    State(state): State<AppState>,
    Auth(viewer): Auth,
) -> ApiResult<Html<String>> {
    let html = state
        .pages
        .render_admin(
            &viewer,
            "/admin/cache-clear",
            "Clear cache",
            "cache_clear",
            &json!({ "caches": CACHES }),
        )
        .context("Failed to render cache page")?;
    Ok(Html(html))
}

/// Admin shortcut to the generic job-creation page.
pub async fn admin_new_job() -> Redirect {
    Redirect::to(JOB_CREATION_PAGE)
}

/// Roles the viewer may hand out: never above their own.
pub fn assignable_roles(viewer_role: Option<Role>) -> Vec<Role> {
    match viewer_role {
        Some(viewer_role) => Role::ALL.into_iter().filter(|r| *r <= viewer_role).collect(),
        None => Vec::new(),
    }
}

pub async fn admin_new_user(
    State(state): State<AppState>,
    Auth(viewer): Auth,
) -> ApiResult<Html<String>> {
    let roles: Vec<&str> = assignable_roles(viewer.role)
        .iter()
        .map(Role::as_str)
        .collect();

    let html = state
        .pages
        .render_admin(
            &viewer,
            "/admin/users/new",
            "New user",
            "new_user",
            &json!({ "roles": roles }),
        )
        .context("Failed to render new user page")?;
    Ok(Html(html))
}

pub async fn job_new(State(state): State<AppState>, Auth(viewer): Auth) -> ApiResult<Html<String>> {
    let html = state
        .pages
        .render("job_new", &json!({ "viewer_name": viewer.name }))
        .context("Failed to render job creation page")?;
    Ok(Html(html))
}
