//! PostgreSQL repository implementations, one per aggregate.

pub mod job;
pub mod license;
pub mod printer;

pub use job::JobRepository;
pub use license::LicenseRepository;
pub use printer::PrinterRepository;
