//! Job lifecycle: append-only creation, single-consumer claim, terminal
//! report.

use tracing::info;
use uuid::Uuid;

use cloudprint_core::error::AppError;
use cloudprint_core::result::AppResult;
use cloudprint_database::store::{JobStore, JobStoreDispatch};
use cloudprint_entity::job::{PrintJob, ReportStatus};
use cloudprint_entity::license::License;

/// The print job queue.
#[derive(Debug, Clone)]
pub struct JobQueue {
    store: JobStoreDispatch,
}

impl JobQueue {
    /// Create a new queue over the given store.
    pub fn new(store: JobStoreDispatch) -> Self {
        Self { store }
    }

    /// Create a queued job and meter one usage unit on the license.
    ///
    /// The target `printer_uid` is not validated against the registry: a
    /// job for a printer that never registers stays queued indefinitely.
    pub async fn enqueue(
        &self,
        license: &License,
        printer_uid: &str,
        content: &str,
    ) -> AppResult<PrintJob> {
        let job = self.store.enqueue(license.id, printer_uid, content).await?;
        info!(
            license_id = %license.id,
            job_id = %job.id,
            printer_uid = %job.printer_uid,
            "Job enqueued"
        );
        Ok(job)
    }

    /// Hand the oldest queued job for this license to exactly one caller,
    /// flipping it to `assigned` before it is returned. `None` when the
    /// queue is empty (not an error).
    pub async fn claim_next(&self, license: &License) -> AppResult<Option<PrintJob>> {
        let job = self.store.claim_next(license.id).await?;
        if let Some(job) = &job {
            info!(license_id = %license.id, job_id = %job.id, "Job claimed");
        }
        Ok(job)
    }

    /// Record the terminal outcome an agent reports for a job.
    ///
    /// Applies regardless of the job's current status, so a duplicate
    /// report is harmless. Fails with `NotFound` when the job does not
    /// exist or belongs to a different license.
    pub async fn report(
        &self,
        license: &License,
        job_id: Uuid,
        status: ReportStatus,
        error: Option<&str>,
    ) -> AppResult<()> {
        let found = self
            .store
            .report(license.id, job_id, status.as_job_status(), error)
            .await?;
        if !found {
            return Err(AppError::not_found("Job not found"));
        }
        info!(
            license_id = %license.id,
            job_id = %job_id,
            status = %status.as_job_status(),
            "Job outcome recorded"
        );
        Ok(())
    }
}
