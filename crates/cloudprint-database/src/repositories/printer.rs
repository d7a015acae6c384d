//! Printer repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use cloudprint_core::error::{AppError, ErrorKind};
use cloudprint_core::result::AppResult;
use cloudprint_entity::license::License;
use cloudprint_entity::printer::{NewPrinter, Printer};

/// Repository for the per-agent printer set.
#[derive(Debug, Clone)]
pub struct PrinterRepository {
    pool: PgPool,
}

impl PrinterRepository {
    /// Create a new printer repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Atomically replace the printer set for `(license, server_uid)`.
    ///
    /// Runs the quota check, the delete, and the inserts in one
    /// transaction: a quota failure mutates nothing, and a concurrent
    /// reader never observes the half-replaced window.
    pub async fn replace_for_server(
        &self,
        license: &License,
        server_uid: &str,
        printers: &[NewPrinter],
    ) -> AppResult<usize> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let known: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT server_uid FROM printers WHERE license_id = $1",
        )
        .bind(license.id)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count servers", e))?;

        if !known.iter().any(|uid| uid == server_uid)
            && known.len() >= license.server_limit as usize
        {
            return Err(AppError::quota_exceeded(format!(
                "Plan limit reached. Max {} print servers allowed.",
                license.server_limit
            )));
        }

        sqlx::query("DELETE FROM printers WHERE license_id = $1 AND server_uid = $2")
            .bind(license.id)
            .bind(server_uid)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete stale printers", e)
            })?;

        for printer in printers {
            sqlx::query(
                "INSERT INTO printers (license_id, server_uid, uid, name) \
                 VALUES ($1, $2, $3, $4) \
                 ON CONFLICT (license_id, server_uid, uid) DO UPDATE SET name = EXCLUDED.name",
            )
            .bind(license.id)
            .bind(server_uid)
            .bind(&printer.uid)
            .bind(&printer.name)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to insert printer", e)
            })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit registration", e)
        })?;

        Ok(printers.len())
    }

    /// Stamp `last_poll = now` on every printer of `(license, server_uid)`.
    pub async fn touch(&self, license_id: Uuid, server_uid: &str) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE printers SET last_poll = NOW() WHERE license_id = $1 AND server_uid = $2",
        )
        .bind(license_id)
        .bind(server_uid)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to touch printers", e))?;
        Ok(result.rows_affected())
    }

    /// List printers for a license, optionally scoped to one agent.
    pub async fn list(
        &self,
        license_id: Uuid,
        server_uid: Option<&str>,
    ) -> AppResult<Vec<Printer>> {
        let query = match server_uid {
            Some(uid) => sqlx::query_as::<_, Printer>(
                "SELECT * FROM printers WHERE license_id = $1 AND server_uid = $2 ORDER BY name",
            )
            .bind(license_id)
            .bind(uid.to_string()),
            None => sqlx::query_as::<_, Printer>(
                "SELECT * FROM printers WHERE license_id = $1 ORDER BY name",
            )
            .bind(license_id),
        };

        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list printers", e))
    }
}
