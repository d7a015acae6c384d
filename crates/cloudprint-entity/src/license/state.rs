//! Derived license state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The lifecycle state of a license.
///
/// Never stored: always recomputed from `(active, expiration_date, today)`
/// so there is no transition logic to go stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseState {
    /// Provisioned but not yet released to a customer.
    Draft,
    /// Usable: every protected operation requires this state.
    Active,
    /// Past its expiration date.
    Expired,
    /// Deactivated by the operator or a subscription cancellation.
    Cancelled,
}

impl LicenseState {
    /// Derive the state from the two stored flags.
    ///
    /// Cancellation wins over expiry: a deactivated license is `Cancelled`
    /// no matter what its expiration date says.
    pub fn derive(active: bool, expiration_date: Option<NaiveDate>, today: NaiveDate) -> Self {
        if !active {
            Self::Cancelled
        } else if expiration_date.is_some_and(|d| d < today) {
            Self::Expired
        } else {
            Self::Active
        }
    }

    /// Return the state as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for LicenseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
