//! Request DTOs.

use serde::Deserialize;
use uuid::Uuid;

use cloudprint_entity::job::ReportStatus;
use cloudprint_entity::printer::NewPrinter;

/// Body of `POST /api/agent/printers`.
#[derive(Debug, Deserialize)]
pub struct RegisterPrintersRequest {
    /// Agent identity; falls back to the `X-Server-ID` header, then
    /// `"default"`.
    #[serde(default)]
    pub server_uid: Option<String>,
    /// The full printer set this agent currently exposes.
    #[serde(default)]
    pub printers: Vec<PrinterEntry>,
}

/// One printer entry in a registration call.
///
/// Current agents send `{os_id, name}`; older ones sent bare name
/// strings, which are accepted as both identifier and name.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PrinterEntry {
    /// Structured entry.
    Detail {
        /// OS-level printer identifier.
        #[serde(default)]
        os_id: Option<String>,
        /// Alternate identifier field.
        #[serde(default)]
        uid: Option<String>,
        /// Display name.
        #[serde(default)]
        name: Option<String>,
    },
    /// Legacy bare-string entry.
    Name(String),
}

impl PrinterEntry {
    /// Normalize into a [`NewPrinter`], or `None` when the entry carries
    /// neither an identifier nor a name.
    pub fn into_new_printer(self) -> Option<NewPrinter> {
        match self {
            Self::Detail { os_id, uid, name } => NewPrinter::from_parts(os_id, uid, name),
            Self::Name(s) => NewPrinter::from_parts(None, Some(s.clone()), Some(s)),
        }
    }
}

/// Body of `POST /api/jobs/status`.
#[derive(Debug, Deserialize)]
pub struct ReportStatusRequest {
    /// The job being reported.
    pub job_id: Uuid,
    /// Terminal outcome.
    pub status: ReportStatus,
    /// Error detail when the status is `error`.
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of `POST /api/print/jobs`.
#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    /// Target printer identifier; not validated against the registry.
    pub printer_uid: String,
    /// Base64-encoded document payload.
    pub content: String,
}

/// Query string of `GET /api/printers`.
#[derive(Debug, Deserialize)]
pub struct ListPrintersQuery {
    /// Optional agent scope.
    #[serde(default)]
    pub server_uid: Option<String>,
}

/// Body of `POST /api/license/validate`.
#[derive(Debug, Deserialize)]
pub struct ValidateLicenseRequest {
    /// The credential to check.
    #[serde(default)]
    pub license_key: Option<String>,
}
