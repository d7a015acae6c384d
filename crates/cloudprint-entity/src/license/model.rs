//! License entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::state::LicenseState;

/// A customer license.
///
/// The `key` is the opaque bearer credential carried by every protected
/// API call; `state` is never stored and must be derived via [`License::state`].
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct License {
    /// Unique license identifier.
    pub id: Uuid,
    /// The license key (opaque credential string, unique).
    pub key: String,
    /// Owning customer.
    pub customer: String,
    /// Deactivation flag; flipped off on cancellation.
    pub active: bool,
    /// Optional expiration date; `None` means the license never expires.
    pub expiration_date: Option<NaiveDate>,
    /// Maximum number of distinct print servers (agents) allowed.
    pub server_limit: i32,
    /// Usage counter: one unit per enqueued job, monotonically increasing.
    pub print_count: i64,
    /// When the license was created.
    pub created_at: DateTime<Utc>,
    /// When the license was last updated.
    pub updated_at: DateTime<Utc>,
}

impl License {
    /// Derive the current lifecycle state for the given day.
    pub fn state(&self, today: NaiveDate) -> LicenseState {
        LicenseState::derive(self.active, self.expiration_date, today)
    }

    /// Whether the license authorizes protected operations today.
    pub fn is_usable(&self, today: NaiveDate) -> bool {
        self.state(today) == LicenseState::Active
    }
}

/// Data required to provision a new license.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLicense {
    /// Owning customer.
    pub customer: String,
    /// Optional expiration date.
    pub expiration_date: Option<NaiveDate>,
    /// Maximum number of distinct print servers.
    pub server_limit: i32,
}

impl NewLicense {
    /// Generate a fresh credential string for this license.
    pub fn generate_key() -> String {
        Uuid::new_v4().to_string()
    }
}
