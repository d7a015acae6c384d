//! The per-agent printer set: replace-on-register, liveness on poll.

use tracing::{debug, info};

use cloudprint_core::result::AppResult;
use cloudprint_database::store::{PrinterStore, PrinterStoreDispatch};
use cloudprint_entity::license::License;
use cloudprint_entity::printer::{NewPrinter, Printer};

/// Tracks which printers each agent currently exposes.
#[derive(Debug, Clone)]
pub struct PrinterRegistry {
    store: PrinterStoreDispatch,
}

impl PrinterRegistry {
    /// Create a new registry over the given store.
    pub fn new(store: PrinterStoreDispatch) -> Self {
        Self { store }
    }

    /// Replace the printer set reported by one agent.
    ///
    /// This is replace-not-merge: printers the agent stopped sending
    /// disappear. Fails with `QuotaExceeded` — without mutating anything —
    /// when a previously unseen `server_uid` would exceed the license's
    /// server limit.
    pub async fn register(
        &self,
        license: &License,
        server_uid: &str,
        printers: &[NewPrinter],
    ) -> AppResult<usize> {
        let count = self
            .store
            .replace_for_server(license, server_uid, printers)
            .await?;
        info!(
            license_id = %license.id,
            server_uid = %server_uid,
            printers = count,
            "Printer set registered"
        );
        Ok(count)
    }

    /// Record that an agent just polled, refreshing liveness for all of
    /// its printers. Called once per job fetch whether or not a job was
    /// waiting.
    pub async fn touch(&self, license: &License, server_uid: &str) -> AppResult<()> {
        let touched = self.store.touch(license.id, server_uid).await?;
        debug!(
            license_id = %license.id,
            server_uid = %server_uid,
            printers = touched,
            "Agent poll recorded"
        );
        Ok(())
    }

    /// List printers for a license, optionally scoped to one agent.
    ///
    /// Liveness is derived from `last_poll` by the caller at read time
    /// via [`Printer::is_online`]; nothing is stored.
    pub async fn list(
        &self,
        license: &License,
        server_uid: Option<&str>,
    ) -> AppResult<Vec<Printer>> {
        self.store.list(license.id, server_uid).await
    }
}
