//! License validation service.

pub mod validator;

pub use validator::LicenseValidator;
