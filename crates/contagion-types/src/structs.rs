//! Core data structs shared across the workspace: coordinates, airports and
//! journey payloads.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{AirportSize, Continent};
use crate::ids::CountryCode;

// ---------------------------------------------------------------------------
// Coordinates
// ---------------------------------------------------------------------------

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Coordinates {
    /// Latitude, -90 (south) to 90 (north).
    pub lat: f64,
    /// Longitude, -180 (west) to 180 (east).
    pub lon: f64,
}

impl Coordinates {
    /// Create a coordinate pair.
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether both components are finite and within their valid ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

// ---------------------------------------------------------------------------
// Airport
// ---------------------------------------------------------------------------

/// Static airport reference data. Never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Airport {
    /// IATA code, e.g. `JNB`.
    pub iata: String,
    /// Display name.
    pub name: String,
    /// Location of the airport.
    pub position: Coordinates,
    /// Country the airport belongs to.
    pub country: CountryCode,
    /// Continent the airport belongs to.
    pub continent: Continent,
    /// Size class.
    pub size: AirportSize,
    /// Whether the airport is in operation.
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// Passenger manifest snapshot taken at boarding.
///
/// Boarded passengers are partitioned by carrier status; the four categories
/// always sum to `boarded`. A payload is immutable once built and consumed
/// exactly once, on arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Payload {
    /// Seats on the vehicle.
    pub capacity: u64,
    /// Passengers actually boarded (at most `capacity`).
    pub boarded: u64,
    /// Carriers of bacon only.
    pub bacon_only: u64,
    /// Carriers of sniffles only.
    pub sniffles_only: u64,
    /// Carriers of both bacon and sniffles.
    pub both: u64,
    /// Carriers of neither.
    pub neither: u64,
}

impl Payload {
    /// An empty payload for a vehicle with the given capacity.
    pub const fn empty(capacity: u64) -> Self {
        Self {
            capacity,
            boarded: 0,
            bacon_only: 0,
            sniffles_only: 0,
            both: 0,
            neither: 0,
        }
    }

    /// Passengers carrying bacon (with or without sniffles).
    pub const fn bacon_carriers(&self) -> u64 {
        self.bacon_only.saturating_add(self.both)
    }

    /// Passengers carrying sniffles (with or without bacon).
    pub const fn sniffles_carriers(&self) -> u64 {
        self.sniffles_only.saturating_add(self.both)
    }

    /// Sum of the four carrier categories.
    pub const fn category_total(&self) -> u64 {
        self.bacon_only
            .saturating_add(self.sniffles_only)
            .saturating_add(self.both)
            .saturating_add(self.neither)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_validity() {
        assert!(Coordinates::new(-26.13, 28.24).is_valid());
        assert!(!Coordinates::new(91.0, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, f64::NAN).is_valid());
    }

    #[test]
    fn payload_carrier_counts() {
        let payload = Payload {
            capacity: 100,
            boarded: 100,
            bacon_only: 20,
            sniffles_only: 10,
            both: 5,
            neither: 65,
        };
        assert_eq!(payload.bacon_carriers(), 25);
        assert_eq!(payload.sniffles_carriers(), 15);
        assert_eq!(payload.category_total(), payload.boarded);
    }

    #[test]
    fn airport_active_defaults_to_true() {
        let json = r#"{
            "iata": "GBE",
            "name": "Sir Seretse Khama International Airport",
            "position": { "lat": -24.555, "lon": 25.918 },
            "country": "BW",
            "continent": "AF",
            "size": "medium"
        }"#;
        let airport: Result<Airport, _> = serde_json::from_str(json);
        assert!(airport.is_ok());
        assert!(airport.ok().is_some_and(|a| a.active));
    }
}
