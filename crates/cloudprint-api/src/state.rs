//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use cloudprint_core::config::AppConfig;
use cloudprint_database::store::{JobStoreDispatch, LicenseStoreDispatch, PrinterStoreDispatch};
use cloudprint_service::{JobQueue, LicenseValidator, PrinterRegistry};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// License credential validator.
    pub licenses: Arc<LicenseValidator>,
    /// Per-agent printer registry.
    pub registry: Arc<PrinterRegistry>,
    /// Print job queue.
    pub queue: Arc<JobQueue>,
}

/// Build the application state from a configuration and store backends.
pub fn build_state(
    config: Arc<AppConfig>,
    licenses: LicenseStoreDispatch,
    printers: PrinterStoreDispatch,
    jobs: JobStoreDispatch,
) -> AppState {
    AppState {
        config,
        licenses: Arc::new(LicenseValidator::new(licenses)),
        registry: Arc::new(PrinterRegistry::new(printers)),
        queue: Arc::new(JobQueue::new(jobs)),
    }
}
