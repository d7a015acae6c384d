//! CloudPrint server — SaaS print dispatch backend.
//!
//! Main entry point that wires configuration, the store backend, and the
//! HTTP API together and runs the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use cloudprint_api::{build_app, build_state};
use cloudprint_core::config::{AppConfig, StoreBackend};
use cloudprint_core::error::AppError;
use cloudprint_database::store::{
    JobStoreDispatch, LicenseStore, LicenseStoreDispatch, PrinterStoreDispatch,
    memory::MemoryStore,
};
use cloudprint_database::{connection, migration, repositories};
use cloudprint_entity::license::NewLicense;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment.
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("CLOUDPRINT_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());

    let env = std::env::var("CLOUDPRINT_ENV").unwrap_or_else(|_| "development".to_string());
    let env_config_path = format!("config/{}.toml", env);

    AppConfig::load_layered(&config_path, Some(&env_config_path))
}

/// Initialize tracing/logging.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt().json().with_env_filter(filter).with_target(true).init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function.
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting CloudPrint v{}", env!("CARGO_PKG_VERSION"));

    let config = Arc::new(config);

    // ── Step 1: Store backend ────────────────────────────────────
    let (licenses, printers, jobs) = match config.database.backend {
        StoreBackend::Postgres => {
            let pool = connection::create_pool(&config.database).await?;
            migration::run_migrations(&pool).await?;
            (
                LicenseStoreDispatch::Postgres(repositories::LicenseRepository::new(pool.clone())),
                PrinterStoreDispatch::Postgres(repositories::PrinterRepository::new(pool.clone())),
                JobStoreDispatch::Postgres(repositories::JobRepository::new(pool)),
            )
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store: state is lost on restart");
            let store = MemoryStore::new();
            let license = store
                .create(&NewLicense {
                    customer: "Development".to_string(),
                    expiration_date: None,
                    server_limit: 1,
                })
                .await?;
            tracing::info!(key = %license.key, "Provisioned a development license");
            (
                LicenseStoreDispatch::Memory(store.clone()),
                PrinterStoreDispatch::Memory(store.clone()),
                JobStoreDispatch::Memory(store),
            )
        }
    };

    // ── Step 2: State and router ─────────────────────────────────
    let state = build_state(Arc::clone(&config), licenses, printers, jobs);
    let app = build_app(state);

    // ── Step 3: Serve ────────────────────────────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolve when the process receives a shutdown signal.
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("Shutdown signal received");
    }
}
