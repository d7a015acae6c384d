//! Print job queue service.

pub mod queue;

pub use queue::JobQueue;
