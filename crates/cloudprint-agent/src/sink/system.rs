//! System print sink — shells out to the platform print tools.
//!
//! Unix (CUPS): `lpstat -a` to enumerate, `lp -d <printer> <file>` to
//! print. Windows: PowerShell `Get-Printer` to enumerate and
//! `Start-Process -Verb PrintTo` to hand the document to the associated
//! viewer. The payload is spooled through a named temp file that is
//! removed on every exit path.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use cloudprint_core::error::{AppError, ErrorKind};
use cloudprint_core::result::AppResult;

use super::{LocalPrinter, PrintSink};

/// Print sink backed by the operating system's print tools.
#[derive(Debug, Default)]
pub struct SystemSink;

impl SystemSink {
    /// Create a new system sink.
    pub fn new() -> Self {
        Self
    }

    async fn discover_unix(&self) -> AppResult<Vec<LocalPrinter>> {
        // lpstat -a lines look like: "printer_name accepting requests since ..."
        let output = Command::new("lpstat")
            .arg("-a")
            .output()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Sink, "Failed to run lpstat", e))?;

        if !output.status.success() {
            return Err(AppError::sink(format!(
                "lpstat exited with {}",
                output.status
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout
            .lines()
            .filter_map(|line| line.split_whitespace().next())
            .map(|name| LocalPrinter {
                os_id: name.to_string(),
                name: name.to_string(),
            })
            .collect())
    }

    async fn discover_windows(&self) -> AppResult<Vec<LocalPrinter>> {
        let output = Command::new("powershell")
            .args(["-Command", "Get-Printer | Select-Object Name"])
            .output()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Sink, "Failed to run Get-Printer", e))?;

        if !output.status.success() {
            return Err(AppError::sink(format!(
                "Get-Printer exited with {}",
                output.status
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        // Skip the "Name" header and its underline.
        Ok(stdout
            .lines()
            .skip(2)
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|name| LocalPrinter {
                os_id: name.to_string(),
                name: name.to_string(),
            })
            .collect())
    }

    async fn print_unix(&self, path: &std::path::Path, target_id: &str) -> AppResult<()> {
        let output = Command::new("lp")
            .arg("-d")
            .arg(target_id)
            .arg(path)
            .output()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Sink, "Failed to run lp", e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::sink(format!(
                "lp -d {target_id} failed: {}",
                stderr.trim()
            )));
        }
        Ok(())
    }

    async fn print_windows(&self, path: &std::path::Path, target_id: &str) -> AppResult<()> {
        let escaped_target = target_id.replace('\'', "''");
        let command = format!(
            "Start-Process -FilePath '{}' -Verb PrintTo -ArgumentList '{}' -PassThru -Wait",
            path.display(),
            escaped_target
        );

        let output = Command::new("powershell")
            .args(["-Command", &command])
            .output()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Sink, "Failed to run PrintTo", e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::sink(format!(
                "PrintTo on {target_id} failed: {}",
                stderr.trim()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl PrintSink for SystemSink {
    async fn discover(&self) -> AppResult<Vec<LocalPrinter>> {
        let printers = if cfg!(target_os = "windows") {
            self.discover_windows().await?
        } else {
            self.discover_unix().await?
        };
        debug!(count = printers.len(), "Discovered local printers");
        Ok(printers)
    }

    async fn print(&self, content: &[u8], target_id: &str) -> AppResult<()> {
        // Spool through a named temp file; the handle removes the file
        // when this function returns, on success or failure alike.
        let file = tempfile::Builder::new()
            .prefix("cloudprint-job-")
            .suffix(".pdf")
            .tempfile()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Sink, "Failed to create spool file", e)
            })?;

        tokio::fs::write(file.path(), content).await.map_err(|e| {
            AppError::with_source(ErrorKind::Sink, "Failed to write spool file", e)
        })?;

        if cfg!(target_os = "windows") {
            self.print_windows(file.path(), target_id).await?;
        } else {
            self.print_unix(file.path(), target_id).await?;
        }

        info!(target_id = %target_id, bytes = content.len(), "Job sent to printer");
        Ok(())
    }
}
