//! Client-facing printer listing.

use axum::Json;
use axum::extract::{Query, State};
use chrono::Utc;

use crate::dto::request::ListPrintersQuery;
use crate::dto::response::PrinterResponse;
use crate::error::ApiError;
use crate::extractors::LicenseAuth;
use crate::state::AppState;

/// GET /api/printers
///
/// Lists registered printers with their online/offline status, computed
/// against the 2-minute liveness window at read time.
pub async fn list_printers(
    State(state): State<AppState>,
    auth: LicenseAuth,
    Query(query): Query<ListPrintersQuery>,
) -> Result<Json<Vec<PrinterResponse>>, ApiError> {
    let printers = state
        .registry
        .list(&auth.license, query.server_uid.as_deref())
        .await?;

    let now = Utc::now();
    let body = printers
        .into_iter()
        .map(|p| PrinterResponse {
            status: p.status(now).to_string(),
            uid: p.uid,
            name: p.name,
            server_uid: p.server_uid,
        })
        .collect();

    Ok(Json(body))
}
