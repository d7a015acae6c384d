//! # cloudprint-agent
//!
//! The polling agent that runs on a customer's print-server machine. It
//! registers locally discovered printers with the backend, polls for
//! queued jobs over plain HTTP (no inbound connectivity required), spools
//! them to the OS print system, and reports the outcome.

pub mod client;
pub mod config;
pub mod identity;
pub mod runner;
pub mod sink;
