//! Print job domain entities.

pub mod model;
pub mod status;

pub use model::PrintJob;
pub use status::{JobStatus, ReportStatus};
