//! # cloudprint-api
//!
//! HTTP API layer for CloudPrint built on Axum.
//!
//! Provides the agent and client REST endpoints, the license-key
//! extractor, middleware, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use state::{AppState, build_state};
