//! Store traits and backend dispatch.
//!
//! The server runs against PostgreSQL in production and against an
//! in-process backend for development and tests. Each aggregate gets a
//! trait plus a dispatch enum delegating to the chosen backend.

pub mod memory;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use cloudprint_core::result::AppResult;
use cloudprint_entity::job::{JobStatus, PrintJob};
use cloudprint_entity::license::{License, NewLicense};
use cloudprint_entity::printer::{NewPrinter, Printer};

use crate::repositories::{JobRepository, LicenseRepository, PrinterRepository};
use memory::MemoryStore;

/// License lookup and provisioning operations.
#[async_trait]
pub trait LicenseStore: Send + Sync {
    /// Find a license by its credential key.
    async fn find_by_key(&self, key: &str) -> AppResult<Option<License>>;

    /// Provision a new license with a freshly generated key.
    async fn create(&self, data: &NewLicense) -> AppResult<License>;

    /// List all licenses.
    async fn list(&self) -> AppResult<Vec<License>>;

    /// Flip the activation flag. Returns `false` if the key is unknown.
    async fn set_active(&self, key: &str, active: bool) -> AppResult<bool>;

    /// Move the expiration date. Returns `false` if the key is unknown.
    async fn set_expiration(&self, key: &str, expiration: Option<NaiveDate>) -> AppResult<bool>;
}

/// Per-agent printer set operations.
#[async_trait]
pub trait PrinterStore: Send + Sync {
    /// Atomically replace the printer set for `(license, server_uid)`,
    /// enforcing the license's distinct-server quota. A quota failure
    /// must leave the store untouched.
    async fn replace_for_server(
        &self,
        license: &License,
        server_uid: &str,
        printers: &[NewPrinter],
    ) -> AppResult<usize>;

    /// Stamp `last_poll = now` on every printer of `(license, server_uid)`.
    async fn touch(&self, license_id: Uuid, server_uid: &str) -> AppResult<u64>;

    /// List printers for a license, optionally scoped to one agent.
    async fn list(&self, license_id: Uuid, server_uid: Option<&str>) -> AppResult<Vec<Printer>>;
}

/// Print job queue operations.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert a queued job and meter one usage unit on the license.
    async fn enqueue(
        &self,
        license_id: Uuid,
        printer_uid: &str,
        content: &str,
    ) -> AppResult<PrintJob>;

    /// Atomically claim the oldest queued job for a license, flipping it
    /// to `assigned` before it is returned. At most one caller may ever
    /// receive a given job.
    async fn claim_next(&self, license_id: Uuid) -> AppResult<Option<PrintJob>>;

    /// Record a terminal status for a job. Returns `false` when no such
    /// job exists under this license.
    async fn report(
        &self,
        license_id: Uuid,
        job_id: Uuid,
        status: JobStatus,
        error: Option<&str>,
    ) -> AppResult<bool>;
}

/// Dispatcher for license storage backends.
#[derive(Debug, Clone)]
pub enum LicenseStoreDispatch {
    /// PostgreSQL-backed (production).
    Postgres(LicenseRepository),
    /// In-process (development and tests).
    Memory(MemoryStore),
}

#[async_trait]
impl LicenseStore for LicenseStoreDispatch {
    async fn find_by_key(&self, key: &str) -> AppResult<Option<License>> {
        match self {
            Self::Postgres(inner) => inner.find_by_key(key).await,
            Self::Memory(inner) => inner.find_by_key(key).await,
        }
    }

    async fn create(&self, data: &NewLicense) -> AppResult<License> {
        match self {
            Self::Postgres(inner) => inner.create(data).await,
            Self::Memory(inner) => inner.create(data).await,
        }
    }

    async fn list(&self) -> AppResult<Vec<License>> {
        match self {
            Self::Postgres(inner) => inner.list().await,
            Self::Memory(inner) => LicenseStore::list(inner).await,
        }
    }

    async fn set_active(&self, key: &str, active: bool) -> AppResult<bool> {
        match self {
            Self::Postgres(inner) => inner.set_active(key, active).await,
            Self::Memory(inner) => inner.set_active(key, active).await,
        }
    }

    async fn set_expiration(&self, key: &str, expiration: Option<NaiveDate>) -> AppResult<bool> {
        match self {
            Self::Postgres(inner) => inner.set_expiration(key, expiration).await,
            Self::Memory(inner) => inner.set_expiration(key, expiration).await,
        }
    }
}

/// Dispatcher for printer storage backends.
#[derive(Debug, Clone)]
pub enum PrinterStoreDispatch {
    /// PostgreSQL-backed (production).
    Postgres(PrinterRepository),
    /// In-process (development and tests).
    Memory(MemoryStore),
}

#[async_trait]
impl PrinterStore for PrinterStoreDispatch {
    async fn replace_for_server(
        &self,
        license: &License,
        server_uid: &str,
        printers: &[NewPrinter],
    ) -> AppResult<usize> {
        match self {
            Self::Postgres(inner) => inner.replace_for_server(license, server_uid, printers).await,
            Self::Memory(inner) => inner.replace_for_server(license, server_uid, printers).await,
        }
    }

    async fn touch(&self, license_id: Uuid, server_uid: &str) -> AppResult<u64> {
        match self {
            Self::Postgres(inner) => inner.touch(license_id, server_uid).await,
            Self::Memory(inner) => inner.touch(license_id, server_uid).await,
        }
    }

    async fn list(&self, license_id: Uuid, server_uid: Option<&str>) -> AppResult<Vec<Printer>> {
        match self {
            Self::Postgres(inner) => inner.list(license_id, server_uid).await,
            Self::Memory(inner) => PrinterStore::list(inner, license_id, server_uid).await,
        }
    }
}

/// Dispatcher for print job storage backends.
#[derive(Debug, Clone)]
pub enum JobStoreDispatch {
    /// PostgreSQL-backed (production).
    Postgres(JobRepository),
    /// In-process (development and tests).
    Memory(MemoryStore),
}

#[async_trait]
impl JobStore for JobStoreDispatch {
    async fn enqueue(
        &self,
        license_id: Uuid,
        printer_uid: &str,
        content: &str,
    ) -> AppResult<PrintJob> {
        match self {
            Self::Postgres(inner) => inner.enqueue(license_id, printer_uid, content).await,
            Self::Memory(inner) => inner.enqueue(license_id, printer_uid, content).await,
        }
    }

    async fn claim_next(&self, license_id: Uuid) -> AppResult<Option<PrintJob>> {
        match self {
            Self::Postgres(inner) => inner.claim_next(license_id).await,
            Self::Memory(inner) => inner.claim_next(license_id).await,
        }
    }

    async fn report(
        &self,
        license_id: Uuid,
        job_id: Uuid,
        status: JobStatus,
        error: Option<&str>,
    ) -> AppResult<bool> {
        match self {
            Self::Postgres(inner) => inner.report(license_id, job_id, status, error).await,
            Self::Memory(inner) => inner.report(license_id, job_id, status, error).await,
        }
    }
}
