//! License domain entities.

pub mod model;
pub mod state;

pub use model::{License, NewLicense};
pub use state::LicenseState;
