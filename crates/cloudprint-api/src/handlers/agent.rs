//! Agent-facing handlers: printer registration and job fetch.

use axum::Json;
use axum::extract::State;
use tracing::warn;

use cloudprint_entity::printer::NewPrinter;

use crate::dto::request::{PrinterEntry, RegisterPrintersRequest};
use crate::dto::response::{JobPayload, OkResponse};
use crate::error::ApiError;
use crate::extractors::LicenseAuth;
use crate::state::AppState;

/// POST /api/agent/printers
///
/// Replaces the caller's printer set. The agent identity comes from the
/// body, falling back to the `X-Server-ID` header.
pub async fn register_printers(
    State(state): State<AppState>,
    auth: LicenseAuth,
    Json(req): Json<RegisterPrintersRequest>,
) -> Result<Json<OkResponse>, ApiError> {
    let server_uid = req
        .server_uid
        .or_else(|| auth.server_uid.clone())
        .unwrap_or_else(|| "default".to_string());

    let printers: Vec<NewPrinter> = req
        .printers
        .into_iter()
        .filter_map(PrinterEntry::into_new_printer)
        .collect();

    state
        .registry
        .register(&auth.license, &server_uid, &printers)
        .await?;

    Ok(Json(OkResponse::ok()))
}

/// GET /api/agent/jobs
///
/// Refreshes printer liveness for the polling agent, then hands out at
/// most one queued job. The body is JSON `null` when the queue is empty.
pub async fn fetch_job(
    State(state): State<AppState>,
    auth: LicenseAuth,
) -> Result<Json<Option<JobPayload>>, ApiError> {
    match &auth.server_uid {
        Some(server_uid) => state.registry.touch(&auth.license, server_uid).await?,
        None => warn!(license_id = %auth.license.id, "Agent poll without X-Server-ID"),
    }

    let job = state.queue.claim_next(&auth.license).await?;
    Ok(Json(job.map(JobPayload::from)))
}
