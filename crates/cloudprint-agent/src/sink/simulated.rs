//! Simulated print sink for dev mode.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use cloudprint_core::error::{AppError, ErrorKind};
use cloudprint_core::result::AppResult;

use super::{LocalPrinter, PrintSink};

/// Identifier of the synthetic dev-mode printer.
pub const DEV_PRINTER_UID: &str = "DEV_PDF";

/// Simulated sink: one always-available printer that writes decoded
/// payloads into an output directory for manual inspection.
#[derive(Debug)]
pub struct SimulatedSink {
    output_dir: PathBuf,
}

impl SimulatedSink {
    /// Create a simulated sink writing into the given directory.
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }
}

#[async_trait]
impl PrintSink for SimulatedSink {
    async fn discover(&self) -> AppResult<Vec<LocalPrinter>> {
        Ok(vec![LocalPrinter {
            os_id: DEV_PRINTER_UID.to_string(),
            name: "Dev PDF Printer".to_string(),
        }])
    }

    async fn print(&self, content: &[u8], target_id: &str) -> AppResult<()> {
        let path = self
            .output_dir
            .join(format!("job_{}.pdf", Uuid::new_v4().simple()));

        tokio::fs::write(&path, content).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Sink,
                format!("Failed to write {}", path.display()),
                e,
            )
        })?;

        info!(
            target_id = %target_id,
            path = %path.display(),
            "Simulated print, output kept for inspection"
        );
        Ok(())
    }
}
