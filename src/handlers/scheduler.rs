// src/handlers/scheduler.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{error::AppError, scheduler::Scheduler};

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateJobRequest {
    pub enabled: bool,
}

/// Lists the daily jobs with their last and next run.
/// Local only.
#[utoipa::path(
    get,
    path = "/scheduler",
    tag = "scheduler",
    responses((status = 200, description = "Scheduled jobs", body = [crate::scheduler::JobStatus]))
)]
pub async fn list_jobs(State(scheduler): State<Arc<Scheduler>>) -> impl IntoResponse {
    Json(scheduler.status().await)
}

/// Enables or disables a daily job.
/// Local only.
#[utoipa::path(
    put,
    path = "/scheduler/jobs/{id}",
    tag = "scheduler",
    params(("id" = Uuid, Path, description = "Job id")),
    request_body = UpdateJobRequest,
    responses(
        (status = 200, description = "Updated job", body = crate::scheduler::JobStatus),
        (status = 404, description = "Unknown job")
    )
)]
pub async fn update_job(
    State(scheduler): State<Arc<Scheduler>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJobRequest>,
) -> Result<impl IntoResponse, AppError> {
    let status = scheduler
        .set_enabled(id, payload.enabled)
        .await
        .ok_or(AppError::NotFound("Job not found".to_string()))?;

    Ok(Json(status))
}
