//! Render-sink snapshot types.
//!
//! After every tick the engine can produce a [`WorldSnapshot`]: plain values
//! the presentation layer maps to visuals. These types are exported to
//! `TypeScript` so the map front-end reads them without hand-written
//! mirrors.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::JourneyPhase;
use crate::ids::{CountryCode, JourneyId};
use crate::structs::{Coordinates, Payload};

/// Amount of one resource in a country and its share of the population.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ResourceReading {
    /// Absolute amount.
    pub amount: u64,
    /// `floor(amount / population * 100)`, 0 when undefined.
    pub percentage: u32,
}

/// Per-country values for one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CountrySnapshot {
    /// Country code.
    pub code: CountryCode,
    /// Current population.
    pub population: u64,
    /// `log10(population)`, 0 for an empty country.
    pub population_magnitude: f64,
    /// Constant prophylaxis factor.
    pub prophylaxis: f64,
    /// Bacon reading.
    pub bacon: ResourceReading,
    /// Sniffles reading.
    pub sniffles: ResourceReading,
    /// Smiles reading.
    pub smiles: ResourceReading,
    /// Apples reading (percentage may exceed 100).
    pub apples: ResourceReading,
}

/// Position and cargo of one in-flight vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct VehicleSnapshot {
    /// Journey the vehicle belongs to.
    pub journey_id: JourneyId,
    /// Lifecycle phase.
    pub phase: JourneyPhase,
    /// Origin airport IATA code.
    pub origin: String,
    /// Destination airport IATA code.
    pub destination: String,
    /// Current position.
    pub position: Coordinates,
    /// Heading in degrees clockwise from north.
    pub bearing_deg: f64,
    /// Altitude in kilometres.
    pub altitude_km: f64,
    /// Distance flown so far in kilometres.
    pub distance_traveled_km: f64,
    /// Total path length in kilometres.
    pub distance_total_km: f64,
    /// Passenger manifest.
    pub payload: Payload,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WorldSnapshot {
    /// Base tick the snapshot was taken after.
    pub tick: u64,
    /// Simulated calendar date.
    pub date: NaiveDate,
    /// One entry per country, ordered by code.
    pub countries: Vec<CountrySnapshot>,
    /// One entry per journey in flight.
    pub vehicles: Vec<VehicleSnapshot>,
}

impl WorldSnapshot {
    /// Find the snapshot of a single country.
    pub fn country(&self, code: &CountryCode) -> Option<&CountrySnapshot> {
        self.countries.iter().find(|c| &c.code == code)
    }
}
