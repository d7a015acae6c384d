//! Print sink abstraction.
//!
//! The sink is the OS-level mechanism that actually produces printed
//! output. The system sink shells out to the platform print tools; the
//! simulated sink backs dev mode with an always-available fake printer.

pub mod simulated;
pub mod system;

use async_trait::async_trait;
use serde::Serialize;

use cloudprint_core::result::AppResult;

pub use simulated::SimulatedSink;
pub use system::SystemSink;

/// A printer as seen by the local OS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalPrinter {
    /// OS-level printer identifier.
    pub os_id: String,
    /// Display name.
    pub name: String,
}

/// The OS printing collaborator.
///
/// Implementations must leave no temp artifacts behind on success or
/// failure.
#[async_trait]
pub trait PrintSink: Send + Sync {
    /// Enumerate the printers this machine exposes.
    async fn discover(&self) -> AppResult<Vec<LocalPrinter>>;

    /// Produce output on the given printer from raw document bytes.
    async fn print(&self, content: &[u8], target_id: &str) -> AppResult<()>;
}

/// Dispatcher for print sink backends.
#[derive(Debug)]
pub enum SinkDispatch {
    /// Real OS printing (production).
    System(SystemSink),
    /// Simulated printing (dev mode).
    Simulated(SimulatedSink),
}

#[async_trait]
impl PrintSink for SinkDispatch {
    async fn discover(&self) -> AppResult<Vec<LocalPrinter>> {
        match self {
            Self::System(inner) => inner.discover().await,
            Self::Simulated(inner) => inner.discover().await,
        }
    }

    async fn print(&self, content: &[u8], target_id: &str) -> AppResult<()> {
        match self {
            Self::System(inner) => inner.print(content, target_id).await,
            Self::Simulated(inner) => inner.print(content, target_id).await,
        }
    }
}
