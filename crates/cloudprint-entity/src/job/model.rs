//! Print job entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::JobStatus;

/// A queued print job.
///
/// `printer_uid` is a free-form string matched against a registered
/// printer's `uid` by the executing agent, not a foreign key — a job
/// targeting a printer that never registers simply stays queued.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PrintJob {
    /// Unique job identifier.
    pub id: Uuid,
    /// Owning license.
    pub license_id: Uuid,
    /// Target printer identifier.
    pub printer_uid: String,
    /// Base64-encoded document payload.
    pub content: String,
    /// Current status.
    pub status: JobStatus,
    /// Error detail reported by the agent, if any.
    pub error: Option<String>,
    /// When the job was created; claims go to the oldest queued job first.
    pub created_at: DateTime<Utc>,
    /// When the job was last updated.
    pub updated_at: DateTime<Utc>,
}
