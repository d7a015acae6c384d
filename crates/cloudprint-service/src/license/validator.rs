//! Credential validation for every protected operation.

use chrono::Utc;
use tracing::debug;

use cloudprint_core::error::AppError;
use cloudprint_core::result::AppResult;
use cloudprint_database::store::{LicenseStore, LicenseStoreDispatch};
use cloudprint_entity::license::{License, LicenseState};

/// Validates presented credentials against license state.
///
/// Every protected operation calls [`LicenseValidator::validate`] first
/// and short-circuits on failure.
#[derive(Debug, Clone)]
pub struct LicenseValidator {
    store: LicenseStoreDispatch,
}

impl LicenseValidator {
    /// Create a new validator over the given store.
    pub fn new(store: LicenseStoreDispatch) -> Self {
        Self { store }
    }

    /// Validate a presented credential.
    ///
    /// Fails with `MissingCredential` if absent, `InvalidCredential` if no
    /// matching license exists, and `LicenseInactive` if the derived state
    /// is not active. The error messages carry no more detail than the
    /// machine-readable code implies.
    pub async fn validate(&self, credential: Option<&str>) -> AppResult<License> {
        let key = match credential {
            Some(key) if !key.is_empty() => key,
            _ => return Err(AppError::missing_credential("Missing license key")),
        };

        let license = self
            .store
            .find_by_key(key)
            .await?
            .ok_or_else(|| AppError::invalid_credential("Invalid license key"))?;

        let today = Utc::now().date_naive();
        let state = license.state(today);
        if state != LicenseState::Active {
            debug!(license_id = %license.id, state = %state, "Rejecting inactive license");
            return Err(AppError::license_inactive("License expired or inactive"));
        }

        Ok(license)
    }

    /// Look up a license without failing on state, for the public
    /// validation endpoint. Returns the license and whether it is usable.
    pub async fn check(&self, key: &str) -> AppResult<Option<(License, bool)>> {
        let Some(license) = self.store.find_by_key(key).await? else {
            return Ok(None);
        };
        let usable = license.is_usable(Utc::now().date_naive());
        Ok(Some((license, usable)))
    }
}
