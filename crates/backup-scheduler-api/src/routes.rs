//! HTTP route definitions.

use axum::{
    Router,
    routing::{get, post},
};
use backup_scheduler_jobs::SchedulerState;
use tower_http::trace::TraceLayer;

use crate::handlers::{dashboard, list_jobs, missing_index, not_found, trigger_job};

/// Build the control API router.
///
/// Methods other than the ones listed get `405`; unknown paths get `404`.
/// Every `POST` below `/api/jobs/` reaches the trigger handler, which
/// answers `400` for anything that is not `{index}` or `{index}/run`.
pub fn create_router(state: SchedulerState) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/jobs", get(dashboard))
        .route("/api/jobs", get(list_jobs))
        .route("/api/jobs/", post(missing_index))
        .route("/api/jobs/{*rest}", post(trigger_job))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
