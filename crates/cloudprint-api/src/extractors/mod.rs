//! Request extractors.

pub mod license;

pub use license::LicenseAuth;
