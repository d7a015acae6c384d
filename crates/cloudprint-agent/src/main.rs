//! CloudPrint agent entry point.

use clap::Parser;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cloudprint_agent::client::ApiClient;
use cloudprint_agent::config::{AgentConfig, AgentOverrides};
use cloudprint_agent::identity;
use cloudprint_agent::runner::AgentRunner;
use cloudprint_agent::sink::{SimulatedSink, SinkDispatch, SystemSink};

/// Cloud print agent: polls the backend for jobs and spools them to
/// local printers.
#[derive(Debug, Parser)]
#[command(name = "cloudprint-agent", version)]
struct AgentArgs {
    /// Backend base URL.
    #[arg(long)]
    api: Option<String>,

    /// Explicit agent identity (derived from the machine when unset).
    #[arg(long)]
    server_id: Option<String>,

    /// License key credential.
    #[arg(long)]
    license_key: Option<String>,

    /// Enable dev mode (simulated printer).
    #[arg(long)]
    dev: bool,

    /// Path to the configuration file.
    #[arg(long, default_value = "agent.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = AgentArgs::parse();

    let mut config = AgentConfig::load(&args.config)?;
    config.apply_overrides(AgentOverrides {
        api: args.api,
        server_id: args.server_id,
        license_key: args.license_key,
        dev: args.dev,
    });

    // Missing credential is the one fatal startup error.
    let Some(license_key) = config.license_key.clone() else {
        anyhow::bail!(
            "License key missing. Set license_key in {} or pass --license-key.",
            args.config
        );
    };

    let server_uid = config
        .server_id
        .clone()
        .unwrap_or_else(|| identity::derive_server_uid(&license_key));

    info!(server_uid = %server_uid, api = %config.api, "Cloud print agent starting");
    info!(
        "Register this identifier as a print server in the backend: {}",
        server_uid
    );

    let client = ApiClient::new(&config.api, &license_key, &server_uid)?;
    let sink = if config.dev_mode {
        info!(output_dir = %config.dev_output_dir, "Dev mode: using simulated printer");
        SinkDispatch::Simulated(SimulatedSink::new(config.dev_output_dir.clone().into()))
    } else {
        SinkDispatch::System(SystemSink::new())
    };

    let runner = AgentRunner::new(client, sink, config);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let loop_handle = tokio::spawn(async move {
        runner.run(shutdown_rx).await;
    });

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");
    let _ = shutdown_tx.send(true);
    loop_handle.await?;

    Ok(())
}
