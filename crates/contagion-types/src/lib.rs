//! Shared type definitions for the Contagion simulation.
//!
//! This crate is the single source of truth for types used across the
//! workspace. Types defined here flow downstream to `TypeScript` via `ts-rs`
//! for the map front-end.
//!
//! # Modules
//!
//! - [`ids`] -- [`CountryCode`] keys and [`JourneyId`] UUID wrappers
//! - [`enums`] -- Resource kinds, airport size classes, continents, journey phases
//! - [`structs`] -- Coordinates, airports and journey payloads
//! - [`snapshot`] -- Render-sink snapshots produced after each tick

pub mod enums;
pub mod ids;
pub mod snapshot;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{AirportSize, Continent, JourneyPhase, ResourceKind};
pub use ids::{CountryCode, InvalidCountryCode, JourneyId};
pub use snapshot::{CountrySnapshot, ResourceReading, VehicleSnapshot, WorldSnapshot};
pub use structs::{Airport, Coordinates, Payload};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // ts-rs writes the bindings to `bindings/` relative to the crate root.
        use ts_rs::TS;

        let _ = crate::ids::CountryCode::export_all();
        let _ = crate::ids::JourneyId::export_all();
        let _ = crate::enums::ResourceKind::export_all();
        let _ = crate::enums::AirportSize::export_all();
        let _ = crate::enums::Continent::export_all();
        let _ = crate::enums::JourneyPhase::export_all();
        let _ = crate::structs::Coordinates::export_all();
        let _ = crate::structs::Airport::export_all();
        let _ = crate::structs::Payload::export_all();
        let _ = crate::snapshot::ResourceReading::export_all();
        let _ = crate::snapshot::CountrySnapshot::export_all();
        let _ = crate::snapshot::VehicleSnapshot::export_all();
        let _ = crate::snapshot::WorldSnapshot::export_all();
    }
}
