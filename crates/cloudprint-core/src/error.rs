//! Unified application error types for CloudPrint.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// No credential was presented on a protected call.
    MissingCredential,
    /// The presented credential matches no license.
    InvalidCredential,
    /// The license exists but its derived state is not active.
    LicenseInactive,
    /// A license quota (e.g. the print-server limit) would be exceeded.
    QuotaExceeded,
    /// The requested resource was not found.
    NotFound,
    /// Input validation failed.
    Validation,
    /// A database error occurred.
    Database,
    /// A configuration error occurred.
    Configuration,
    /// A network/transport error occurred (agent side).
    Transport,
    /// The print sink failed to produce output (agent side).
    Sink,
    /// An internal server error occurred.
    Internal,
}

impl ErrorKind {
    /// Whether this kind is one of the credential/authorization failures.
    ///
    /// The agent uses this to pick the longer poll backoff.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::MissingCredential | Self::InvalidCredential | Self::LicenseInactive
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredential => write!(f, "MISSING_CREDENTIAL"),
            Self::InvalidCredential => write!(f, "INVALID_CREDENTIAL"),
            Self::LicenseInactive => write!(f, "LICENSE_INACTIVE"),
            Self::QuotaExceeded => write!(f, "QUOTA_EXCEEDED"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Database => write!(f, "DATABASE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Transport => write!(f, "TRANSPORT"),
            Self::Sink => write!(f, "SINK"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout CloudPrint.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls. This provides a single error type for
/// the entire application boundary.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a missing-credential error.
    pub fn missing_credential(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingCredential, message)
    }

    /// Create an invalid-credential error.
    pub fn invalid_credential(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidCredential, message)
    }

    /// Create a license-inactive error.
    pub fn license_inactive(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::LicenseInactive, message)
    }

    /// Create a quota-exceeded error.
    pub fn quota_exceeded(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::QuotaExceeded, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    /// Create a print-sink error.
    pub fn sink(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Sink, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}
