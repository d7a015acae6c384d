//! HTTP client for the backend dispatch API.
//!
//! Thin wrapper over reqwest that stamps the `X-License-Key` and
//! `X-Server-ID` headers on every call and maps responses into the
//! application error taxonomy so the poll loop can pick its backoff.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cloudprint_core::error::{AppError, ErrorKind};
use cloudprint_core::result::AppResult;

use crate::sink::LocalPrinter;

/// A job handed out by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct ClaimedJob {
    /// Job identifier, echoed back in the status report.
    pub job_id: Uuid,
    /// Target printer identifier.
    pub printer_uid: String,
    /// Base64-encoded document payload.
    pub content: String,
}

#[derive(Debug, Serialize)]
struct RegisterPrintersBody<'a> {
    server_uid: &'a str,
    printers: &'a [LocalPrinter],
}

#[derive(Debug, Serialize)]
struct ReportStatusBody<'a> {
    job_id: Uuid,
    status: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct WireError {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

/// Client for the backend dispatch API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
    license_key: String,
    server_uid: String,
}

impl ApiClient {
    /// Create a client for the given backend and identity.
    ///
    /// No timeout shorter than reqwest's own default is imposed; a hung
    /// backend stalls the poll until the client times out on its own.
    pub fn new(base: &str, license_key: &str, server_uid: &str) -> AppResult<Self> {
        let http = reqwest::Client::builder().build().map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
        })?;
        Ok(Self {
            http,
            base: base.trim_end_matches('/').to_string(),
            license_key: license_key.to_string(),
            server_uid: server_uid.to_string(),
        })
    }

    /// Replace this agent's printer set on the backend.
    pub async fn register_printers(&self, printers: &[LocalPrinter]) -> AppResult<()> {
        let response = self
            .http
            .post(format!("{}/api/agent/printers", self.base))
            .header("X-License-Key", &self.license_key)
            .header("X-Server-ID", &self.server_uid)
            .json(&RegisterPrintersBody {
                server_uid: &self.server_uid,
                printers,
            })
            .send()
            .await
            .map_err(transport_error)?;

        self.check_status(response).await?;
        Ok(())
    }

    /// Fetch at most one queued job. `None` means the queue was empty.
    pub async fn fetch_job(&self) -> AppResult<Option<ClaimedJob>> {
        let response = self
            .http
            .get(format!("{}/api/agent/jobs", self.base))
            .header("X-License-Key", &self.license_key)
            .header("X-Server-ID", &self.server_uid)
            .send()
            .await
            .map_err(transport_error)?;

        let response = self.check_status(response).await?;
        response
            .json::<Option<ClaimedJob>>()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Transport, "Malformed job payload", e))
    }

    /// Report the terminal outcome for a claimed job.
    pub async fn report(
        &self,
        job_id: Uuid,
        status: &str,
        error: Option<&str>,
    ) -> AppResult<()> {
        let response = self
            .http
            .post(format!("{}/api/jobs/status", self.base))
            .header("X-License-Key", &self.license_key)
            .header("X-Server-ID", &self.server_uid)
            .json(&ReportStatusBody {
                job_id,
                status,
                error,
            })
            .send()
            .await
            .map_err(transport_error)?;

        self.check_status(response).await?;
        Ok(())
    }

    /// Map an error response to the taxonomy, passing success through.
    async fn check_status(&self, response: reqwest::Response) -> AppResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let wire = response.json::<WireError>().await.unwrap_or(WireError {
            error: None,
            code: None,
        });
        let message = wire
            .error
            .unwrap_or_else(|| format!("Backend returned {status}"));

        let kind = match wire.code.as_deref() {
            Some("missing_key") => ErrorKind::MissingCredential,
            Some("invalid_key") => ErrorKind::InvalidCredential,
            Some("expired_key") => ErrorKind::LicenseInactive,
            Some("limit_reached") => ErrorKind::QuotaExceeded,
            Some("not_found") => ErrorKind::NotFound,
            // Fall back on the HTTP status when the body carries no code.
            _ if status == reqwest::StatusCode::UNAUTHORIZED => ErrorKind::MissingCredential,
            _ if status == reqwest::StatusCode::FORBIDDEN => ErrorKind::InvalidCredential,
            _ if status == reqwest::StatusCode::NOT_FOUND => ErrorKind::NotFound,
            _ => ErrorKind::Transport,
        };

        Err(AppError::new(kind, message))
    }
}

fn transport_error(e: reqwest::Error) -> AppError {
    AppError::with_source(ErrorKind::Transport, format!("Request failed: {e}"), e)
}
