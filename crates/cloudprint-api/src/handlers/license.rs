//! Public license validation endpoint.

use axum::Json;
use axum::extract::State;

use crate::dto::request::ValidateLicenseRequest;
use crate::dto::response::ValidateLicenseResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/license/validate
///
/// Sanity check for provisioning tools: reports whether a key maps to an
/// active license. Never fails on state — an unknown or inactive key
/// yields `{"valid": false}`.
pub async fn validate(
    State(state): State<AppState>,
    Json(req): Json<ValidateLicenseRequest>,
) -> Result<Json<ValidateLicenseResponse>, ApiError> {
    let Some(key) = req.license_key.as_deref().filter(|k| !k.is_empty()) else {
        return Ok(Json(ValidateLicenseResponse {
            valid: false,
            customer: None,
            expiration: None,
        }));
    };

    let body = match state.licenses.check(key).await? {
        Some((license, true)) => ValidateLicenseResponse {
            valid: true,
            customer: Some(license.customer),
            expiration: license.expiration_date,
        },
        _ => ValidateLicenseResponse {
            valid: false,
            customer: None,
            expiration: None,
        },
    };

    Ok(Json(body))
}
