//! Print job repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use cloudprint_core::error::{AppError, ErrorKind};
use cloudprint_core::result::AppResult;
use cloudprint_entity::job::{JobStatus, PrintJob};

/// Repository for print job queue operations.
#[derive(Debug, Clone)]
pub struct JobRepository {
    pool: PgPool,
}

impl JobRepository {
    /// Create a new job repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a queued job and meter one usage unit on the license.
    pub async fn enqueue(
        &self,
        license_id: Uuid,
        printer_uid: &str,
        content: &str,
    ) -> AppResult<PrintJob> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let job = sqlx::query_as::<_, PrintJob>(
            "INSERT INTO print_jobs (license_id, printer_uid, content) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(license_id)
        .bind(printer_uid)
        .bind(content)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to enqueue job", e))?;

        sqlx::query(
            "UPDATE licenses SET print_count = print_count + 1, updated_at = NOW() WHERE id = $1",
        )
        .bind(license_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to meter print count", e)
        })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit enqueue", e)
        })?;

        Ok(job)
    }

    /// Atomically claim the oldest queued job for a license.
    ///
    /// The read-then-flip is a single statement with `FOR UPDATE SKIP
    /// LOCKED`, so of N concurrent pollers each queued job is returned to
    /// exactly one — a racing second poll skips the locked row and takes
    /// the next queued job instead. The row is committed as `assigned`
    /// before this returns.
    pub async fn claim_next(&self, license_id: Uuid) -> AppResult<Option<PrintJob>> {
        sqlx::query_as::<_, PrintJob>(
            "UPDATE print_jobs SET status = 'assigned', updated_at = NOW() \
             WHERE id = ( \
                SELECT id FROM print_jobs \
                WHERE license_id = $1 AND status = 'queued' \
                ORDER BY created_at ASC \
                FOR UPDATE SKIP LOCKED \
                LIMIT 1 \
             ) RETURNING *",
        )
        .bind(license_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to claim job", e))
    }

    /// Record a terminal status for a job.
    ///
    /// Scoped by `(id, license_id)`; returns `false` when no such job
    /// exists under this license. Deliberately overwrites whatever status
    /// the job had, so duplicate reports from a retrying agent are
    /// harmless.
    pub async fn report(
        &self,
        license_id: Uuid,
        job_id: Uuid,
        status: JobStatus,
        error: Option<&str>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE print_jobs SET status = $3, error = $4, updated_at = NOW() \
             WHERE id = $1 AND license_id = $2",
        )
        .bind(job_id)
        .bind(license_id)
        .bind(status)
        .bind(error)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update job", e))?;
        Ok(result.rows_affected() > 0)
    }
}
