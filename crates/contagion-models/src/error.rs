//! Error types for the `contagion-models` crate.

use contagion_ledger::LedgerError;
use contagion_world::WorldError;

/// Errors that can occur while ticking a resource model.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// A ledger read or write failed.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// A graph or population lookup failed.
    #[error("world error: {0}")]
    World(#[from] WorldError),
}
