//! Per-resource country ledgers for the Contagion simulation.
//!
//! Every ledger-backed resource (bacon, sniffles, smiles, apples) keeps one
//! [`ResourceLedger`]: a whole-unit amount for every country in the
//! canonical set. Nothing writes an amount except through the ledger's own
//! entry points, and no entry point can drive an amount below zero.
//!
//! # Entry points
//!
//! | Method | Used by | Semantics |
//! |--------|---------|-----------|
//! | `seed` | initialization | add a non-negative amount |
//! | `delta` | models, journeys | signed add, clamped at 0 |
//! | `migrate` | cross-border spread | signed add, clamped at 0 |
//! | `set` | models | commit a computed tick result |
//!
//! A negative result is never an error: it is clamped to zero and logged at
//! `debug`, and the delta actually applied is returned so callers can
//! conserve what they move.
//!
//! # Usage
//!
//! ```
//! use contagion_ledger::ResourceLedger;
//! use contagion_types::{CountryCode, ResourceKind};
//!
//! let za = CountryCode::new("ZA").ok();
//! let codes: Vec<CountryCode> = za.clone().into_iter().collect();
//! let mut bacon = ResourceLedger::new(ResourceKind::Bacon, codes);
//!
//! if let Some(za) = za {
//!     bacon.seed(&za, 100).ok();
//!     assert_eq!(bacon.delta(&za, -250).ok(), Some(-100));
//!     assert_eq!(bacon.get_amount(&za).ok(), Some(0));
//! }
//! ```

pub mod ledger;

// Re-export primary types at crate root.
pub use ledger::ResourceLedger;

use contagion_types::{CountryCode, ResourceKind};
use contagion_world::WorldError;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when reading or writing a ledger.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LedgerError {
    /// The country is not part of the ledger's country set.
    #[error("{kind} ledger has no entry for country {code}")]
    UnknownCountry {
        /// Resource the ledger tracks.
        kind: ResourceKind,
        /// The missing country.
        code: CountryCode,
    },

    /// A population lookup made on behalf of the ledger failed.
    #[error(transparent)]
    World(#[from] WorldError),
}
