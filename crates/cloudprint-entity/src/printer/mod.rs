//! Printer domain entities.

pub mod model;

pub use model::{NewPrinter, Printer, ONLINE_WINDOW_SECS};
