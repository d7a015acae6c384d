//! `LicenseAuth` extractor — pulls the license key from the
//! `X-License-Key` header, validates it, and injects the license.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use cloudprint_entity::license::License;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted, validated license context available in handlers.
///
/// Every protected endpoint takes this extractor, which guarantees the
/// validator ran and short-circuited before the handler body.
#[derive(Debug, Clone)]
pub struct LicenseAuth {
    /// The validated license.
    pub license: License,
    /// The agent identity from `X-Server-ID`, when the caller is an agent.
    pub server_uid: Option<String>,
}

impl FromRequestParts<AppState> for LicenseAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let key = parts
            .headers
            .get("x-license-key")
            .and_then(|v| v.to_str().ok());

        let license = state.licenses.validate(key).await?;

        let server_uid = parts
            .headers
            .get("x-server-id")
            .and_then(|v| v.to_str().ok())
            .filter(|s| !s.is_empty())
            .map(String::from);

        Ok(LicenseAuth {
            license,
            server_uid,
        })
    }
}
