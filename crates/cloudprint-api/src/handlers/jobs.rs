//! Job handlers: client-side enqueue and agent-side status report.

use axum::Json;
use axum::extract::State;

use crate::dto::request::{CreateJobRequest, ReportStatusRequest};
use crate::dto::response::{CreateJobResponse, OkResponse};
use crate::error::ApiError;
use crate::extractors::LicenseAuth;
use crate::state::AppState;

/// POST /api/print/jobs
pub async fn create_job(
    State(state): State<AppState>,
    auth: LicenseAuth,
    Json(req): Json<CreateJobRequest>,
) -> Result<Json<CreateJobResponse>, ApiError> {
    let job = state
        .queue
        .enqueue(&auth.license, &req.printer_uid, &req.content)
        .await?;

    Ok(Json(CreateJobResponse { job_id: job.id }))
}

/// POST /api/jobs/status
pub async fn report_status(
    State(state): State<AppState>,
    auth: LicenseAuth,
    Json(req): Json<ReportStatusRequest>,
) -> Result<Json<OkResponse>, ApiError> {
    state
        .queue
        .report(&auth.license, req.job_id, req.status, req.error.as_deref())
        .await?;

    Ok(Json(OkResponse::ok()))
}
