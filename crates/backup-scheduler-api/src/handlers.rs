//! HTTP handlers for job listing, manual triggers and the dashboard.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
};
use backup_scheduler_jobs::{JobAction, JobDefinition, SchedulerState, TriggerResult};
use serde::Serialize;
use tracing::info;

use crate::error::ApiError;
use crate::ui;

/// Schedule shown for jobs that only run when triggered.
pub const ON_DEMAND_SCHEDULE: &str = "(on demand / startup)";

/// Display view of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobSummary {
    pub index: usize,
    pub name: String,
    pub schedule: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run: Option<String>,
}

impl From<&JobDefinition> for JobSummary {
    fn from(job: &JobDefinition) -> Self {
        let (command, run) = match &job.action {
            JobAction::Sync(sync) => (Some(sync.to_string()), None),
            JobAction::Shell(shell) => (None, Some(shell.to_string())),
        };

        Self {
            index: job.index,
            name: job.name.clone(),
            schedule: job
                .schedule
                .clone()
                .unwrap_or_else(|| ON_DEMAND_SCHEDULE.to_string()),
            kind: job.action.kind(),
            command,
            run,
        }
    }
}

/// List all jobs.
///
/// GET /api/jobs
pub async fn list_jobs(State(state): State<SchedulerState>) -> Json<Vec<JobSummary>> {
    Json(state.registry().list().iter().map(JobSummary::from).collect())
}

/// Run a job now.
///
/// POST /api/jobs/{index}
/// POST /api/jobs/{index}/run
///
/// Any other path below `/api/jobs/` is answered as an invalid index.
pub async fn trigger_job(
    State(state): State<SchedulerState>,
    Path(rest): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let index = parse_index(&rest)?;
    let job = state.registry().get(index)?;

    match state.trigger(index)? {
        TriggerResult::Accepted => {
            info!(job = %job.display_name(), "Manual run started");
        }
        TriggerResult::Busy => {
            info!(job = %job.display_name(), "Manual run ignored, job is already running");
        }
    }

    Ok((
        StatusCode::ACCEPTED,
        Json(serde_json::json!({ "status": "accepted" })),
    ))
}

/// POST /api/jobs/ with no index.
pub async fn missing_index() -> ApiError {
    ApiError::InvalidIndex(String::new())
}

fn parse_index(rest: &str) -> Result<usize, ApiError> {
    let raw = rest.strip_suffix("/run").unwrap_or(rest);
    raw.parse()
        .map_err(|_| ApiError::InvalidIndex(raw.to_string()))
}

/// Dashboard page.
///
/// GET / and GET /jobs
pub async fn dashboard() -> Html<&'static str> {
    Html(ui::JOBS_PAGE)
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "404 page not found")
}
