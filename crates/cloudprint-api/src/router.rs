//! Route definitions for the CloudPrint HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState`
//! and passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::state::AppState;

/// Build the route tree without outer middleware layers.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(agent_routes())
        .merge(client_routes())
        .merge(health_routes());

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Endpoints called by the polling agent.
fn agent_routes() -> Router<AppState> {
    Router::new()
        .route("/agent/printers", post(handlers::agent::register_printers))
        .route("/agent/jobs", get(handlers::agent::fetch_job))
        .route("/jobs/status", post(handlers::jobs::report_status))
}

/// Endpoints called by client applications and provisioning tools.
fn client_routes() -> Router<AppState> {
    Router::new()
        .route("/printers", get(handlers::printers::list_printers))
        .route("/print/jobs", post(handlers::jobs::create_job))
        .route("/license/validate", post(handlers::license::validate))
}

/// Health check endpoints (no auth required).
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health_check))
}
