//! Error types for the `contagion-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`] through the
//! standard [`Result`] type alias.

use contagion_types::CountryCode;

/// Errors that can occur during country-graph, population and geodesy
/// operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorldError {
    /// A country code is not part of the canonical country set.
    #[error("unknown country: {0}")]
    UnknownCountry(CountryCode),

    /// A country was inserted twice where uniqueness is required.
    #[error("duplicate country: {0}")]
    DuplicateCountry(CountryCode),

    /// Coordinates are non-finite or out of range.
    #[error("invalid coordinates: lat {lat}, lon {lon}")]
    InvalidCoordinates {
        /// The offending latitude.
        lat: f64,
        /// The offending longitude.
        lon: f64,
    },

    /// Arithmetic overflow during a checked operation.
    #[error("arithmetic overflow in world calculation")]
    ArithmeticOverflow,
}
