use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use crate::errors::AppError;
use crate::extract::{ApiPath, ApiQuery};
use crate::jobs::form::JobDraft;
use crate::jobs::models::{Job, JobFilter};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<Job>,
    pub total: usize,
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<JobFilter>,
) -> Json<JobListResponse> {
    let board = state.jobs.read().await;
    let jobs = board.list(&filter);
    Json(JobListResponse {
        total: board.len(),
        jobs,
    })
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(draft): Json<JobDraft>,
) -> Result<(StatusCode, Json<Job>), AppError> {
    let draft = draft.normalized();
    debug!(
        "Job draft '{}' with {} skill(s)",
        draft.title,
        draft.skills().len()
    );
    let new_job = draft.submit()?;
    let job = state.jobs.write().await.post(new_job, Utc::now());
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<Job>, AppError> {
    state
        .jobs
        .read()
        .await
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<StatusCode, AppError> {
    state
        .jobs
        .write()
        .await
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}
