//! Agent runner — discovery/sync plus the main poll/execute loop.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use tokio::sync::watch;
use tokio::time;
use tracing::{debug, error, info, warn};

use cloudprint_core::error::AppError;

use crate::client::{ApiClient, ClaimedJob};
use crate::config::AgentConfig;
use crate::sink::{PrintSink, SinkDispatch};

/// The agent's main state machine: a one-shot discovery/sync task running
/// alongside an indefinite poll/execute loop.
#[derive(Debug)]
pub struct AgentRunner {
    client: Arc<ApiClient>,
    sink: Arc<SinkDispatch>,
    config: AgentConfig,
}

impl AgentRunner {
    /// Create a new runner.
    pub fn new(client: ApiClient, sink: SinkDispatch, config: AgentConfig) -> Self {
        Self {
            client: Arc::new(client),
            sink: Arc::new(sink),
            config,
        }
    }

    /// Run until the cancel signal flips to `true`.
    ///
    /// Discovery and registration run in their own task so that a slow
    /// printer enumeration never delays the first poll. Polling failures
    /// never crash the loop; they only pick the backoff for the next
    /// iteration.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        info!(
            api = %self.config.api,
            poll_interval_s = self.config.poll_interval_seconds,
            "Agent loop started"
        );

        let client = Arc::clone(&self.client);
        let sink = Arc::clone(&self.sink);
        tokio::spawn(async move {
            Self::sync_printers(client, sink).await;
        });

        loop {
            if *cancel.borrow() {
                break;
            }

            let delay = self.poll_once().await;

            tokio::select! {
                _ = cancel.changed() => {
                    if *cancel.borrow() {
                        break;
                    }
                }
                _ = time::sleep(delay) => {}
            }
        }

        info!("Agent loop stopped");
    }

    /// DISCOVER + SYNC: enumerate local printers and register the set.
    ///
    /// Registration failure is not fatal — a previously registered set
    /// may still be valid — so errors are surfaced and polling goes on.
    async fn sync_printers(client: Arc<ApiClient>, sink: Arc<SinkDispatch>) {
        let printers = match sink.discover().await {
            Ok(printers) => printers,
            Err(e) => {
                warn!(error = %e, "Printer discovery failed");
                return;
            }
        };

        if printers.is_empty() {
            warn!("No local printers discovered, skipping registration");
            return;
        }

        info!(count = printers.len(), "Discovered local printers");
        match client.register_printers(&printers).await {
            Ok(()) => info!(count = printers.len(), "Printer set registered"),
            Err(e) if e.kind.is_auth() => {
                error!(error = %e, "Authentication failed during printer sync, check the license key");
            }
            Err(e) => warn!(error = %e, "Printer sync failed"),
        }
    }

    /// One POLL (and possibly EXECUTE) iteration. Returns the delay to
    /// sleep before the next poll.
    async fn poll_once(&self) -> Duration {
        let poll = Duration::from_secs(self.config.poll_interval_seconds);

        match self.client.fetch_job().await {
            Ok(Some(job)) => {
                self.execute(job).await;
                poll
            }
            Ok(None) => poll,
            Err(e) if e.kind.is_auth() => {
                warn!(error = %e, "Authorization failed while polling, backing off");
                Duration::from_secs(self.config.auth_backoff_seconds)
            }
            Err(e) => {
                // Transient/network errors are expected while offline.
                debug!(error = %e, "Poll failed");
                poll
            }
        }
    }

    /// EXECUTE: decode, print, and send exactly one best-effort report.
    async fn execute(&self, job: ClaimedJob) {
        info!(job_id = %job.job_id, printer_uid = %job.printer_uid, "Executing job");

        let outcome = match BASE64.decode(&job.content) {
            Ok(bytes) => self.sink.print(&bytes, &job.printer_uid).await,
            Err(e) => Err(AppError::sink(format!("Invalid base64 payload: {e}"))),
        };

        let report = match &outcome {
            Ok(()) => self.client.report(job.job_id, "done", None).await,
            Err(e) => {
                warn!(job_id = %job.job_id, error = %e, "Job failed");
                self.client
                    .report(job.job_id, "error", Some(&e.message))
                    .await
            }
        };

        // A failed report is logged, never retried: retrying against a
        // permanently unreachable backend would loop forever.
        if let Err(e) = report {
            warn!(job_id = %job.job_id, error = %e, "Failed to report job outcome");
        }
    }
}
