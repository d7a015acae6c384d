//! License repository implementation.

use chrono::NaiveDate;
use sqlx::PgPool;

use cloudprint_core::error::{AppError, ErrorKind};
use cloudprint_core::result::AppResult;
use cloudprint_entity::license::{License, NewLicense};

/// Repository for license provisioning and lookup.
#[derive(Debug, Clone)]
pub struct LicenseRepository {
    pool: PgPool,
}

impl LicenseRepository {
    /// Create a new license repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a license by its credential key.
    pub async fn find_by_key(&self, key: &str) -> AppResult<Option<License>> {
        sqlx::query_as::<_, License>("SELECT * FROM licenses WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find license", e))
    }

    /// Provision a new license with a freshly generated key.
    pub async fn create(&self, data: &NewLicense) -> AppResult<License> {
        sqlx::query_as::<_, License>(
            "INSERT INTO licenses (key, customer, expiration_date, server_limit) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(NewLicense::generate_key())
        .bind(&data.customer)
        .bind(data.expiration_date)
        .bind(data.server_limit)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create license", e))
    }

    /// List all licenses, newest first.
    pub async fn list(&self) -> AppResult<Vec<License>> {
        sqlx::query_as::<_, License>("SELECT * FROM licenses ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list licenses", e))
    }

    /// Flip the activation flag. Returns `false` if the key is unknown.
    pub async fn set_active(&self, key: &str, active: bool) -> AppResult<bool> {
        let result =
            sqlx::query("UPDATE licenses SET active = $2, updated_at = NOW() WHERE key = $1")
                .bind(key)
                .bind(active)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to update license", e)
                })?;
        Ok(result.rows_affected() > 0)
    }

    /// Move the expiration date. Returns `false` if the key is unknown.
    pub async fn set_expiration(
        &self,
        key: &str,
        expiration: Option<NaiveDate>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE licenses SET expiration_date = $2, updated_at = NOW() WHERE key = $1",
        )
        .bind(key)
        .bind(expiration)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update license", e))?;
        Ok(result.rows_affected() > 0)
    }
}
