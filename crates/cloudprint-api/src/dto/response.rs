//! Response DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cloudprint_entity::job::PrintJob;

/// Bare acknowledgement body: `{"ok": true}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OkResponse {
    /// Always `true` on success.
    pub ok: bool,
}

impl OkResponse {
    /// The canonical success acknowledgement.
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

/// A claimed job as delivered to an agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPayload {
    /// Job identifier, echoed back in the status report.
    pub job_id: Uuid,
    /// Target printer identifier.
    pub printer_uid: String,
    /// Base64-encoded document payload.
    pub content: String,
}

impl From<PrintJob> for JobPayload {
    fn from(job: PrintJob) -> Self {
        Self {
            job_id: job.id,
            printer_uid: job.printer_uid,
            content: job.content,
        }
    }
}

/// Body returned by `POST /api/print/jobs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJobResponse {
    /// Identifier of the enqueued job.
    pub job_id: Uuid,
}

/// One printer in the `GET /api/printers` listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrinterResponse {
    /// OS-level printer identifier.
    pub uid: String,
    /// Display name.
    pub name: String,
    /// Identity of the agent exposing this printer.
    pub server_uid: String,
    /// `"online"` or `"offline"`, derived at read time.
    pub status: String,
}

/// Body returned by `POST /api/license/validate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateLicenseResponse {
    /// Whether the credential maps to an active license.
    pub valid: bool,
    /// Owning customer, present when valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    /// Expiration date, present when valid and set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration: Option<NaiveDate>,
}

/// Body returned by `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Server version.
    pub version: String,
}
