//! Journey manager: vehicles flying passengers between airports.
//!
//! A journey moves through three phases:
//!
//! ```text
//! Boarding --commit--> InFlight --advance*--> Arrived --retire--> (gone)
//! ```
//!
//! Population and the carried resources (bacon, sniffles) are touched only
//! at the two ends. At boarding the passengers leave the origin country
//! together with their share of carriers; at arrival the same numbers are
//! credited to the destination. Nothing changes in between, so the totals
//! across origin, vehicles and destination are conserved.
//!
//! # Payload partition
//!
//! With `b` and `s` the bacon and sniffles fractions of the origin
//! population:
//!
//! ```text
//! bacon_total    = round(b * boarded)
//! sniffles_total = round(s * boarded)
//! both           = round(b * s * boarded), raised until the union fits
//! bacon_only     = bacon_total - both
//! sniffles_only  = sniffles_total - both
//! neither        = boarded - bacon_only - sniffles_only - both
//! ```

use std::collections::BTreeMap;

use contagion_ledger::{LedgerError, ResourceLedger};
use contagion_types::{Airport, CountryCode, JourneyId, JourneyPhase, Payload};
use contagion_world::geodesic::{self, Path, Vehicle};
use contagion_world::numeric::{round_u64, to_f64, to_i64};
use contagion_world::{PopulationModel, WorldError, choose_route};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, warn};

use crate::config::JourneysConfig;

/// Errors that can occur while boarding, flying or retiring journeys.
#[derive(Debug, thiserror::Error)]
pub enum JourneyError {
    /// Geography or population failure (unknown country, bad coordinates).
    #[error(transparent)]
    World(#[from] WorldError),

    /// Ledger failure (unknown country).
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

// ---------------------------------------------------------------------------
// Journey
// ---------------------------------------------------------------------------

/// One vehicle on one path with one immutable payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Journey {
    /// Unique id, time-ordered.
    pub id: JourneyId,
    /// Departure airport.
    pub origin: Airport,
    /// Arrival airport.
    pub destination: Airport,
    /// Great-circle route fixed at boarding.
    pub path: Path,
    /// Moving state.
    pub vehicle: Vehicle,
    /// Passengers taken from the origin.
    pub payload: Payload,
    /// Lifecycle phase.
    pub phase: JourneyPhase,
}

/// Partition `capacity` seats of passengers from a country.
///
/// `boarded` is `min(population, capacity)`. Carrier totals never exceed
/// the amounts present at the origin.
pub fn compute_payload(population: u64, bacon: u64, sniffles: u64, capacity: u64) -> Payload {
    let boarded = population.min(capacity);
    if boarded == 0 {
        return Payload::empty(capacity);
    }
    let pop = to_f64(population);
    let b = (to_f64(bacon) / pop).clamp(0.0, 1.0);
    let s = (to_f64(sniffles) / pop).clamp(0.0, 1.0);
    let seats = to_f64(boarded);

    let bacon_total = round_u64(b * seats).min(bacon).min(boarded);
    let sniffles_total = round_u64(s * seats).min(sniffles).min(boarded);
    let overlap_cap = bacon_total.min(sniffles_total);

    let mut both = round_u64(b * s * seats).min(overlap_cap);
    let union = bacon_total
        .saturating_add(sniffles_total)
        .saturating_sub(both);
    if union > boarded {
        both = both
            .saturating_add(union.saturating_sub(boarded))
            .min(overlap_cap);
    }

    let bacon_only = bacon_total.saturating_sub(both);
    let sniffles_only = sniffles_total.saturating_sub(both);
    let neither = boarded
        .saturating_sub(bacon_only)
        .saturating_sub(sniffles_only)
        .saturating_sub(both);

    Payload {
        capacity,
        boarded,
        bacon_only,
        sniffles_only,
        both,
        neither,
    }
}

// ---------------------------------------------------------------------------
// Manager
// ---------------------------------------------------------------------------

/// What one manager tick did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JourneyTickReport {
    /// Journeys boarded this tick.
    pub boarded: Vec<JourneyId>,
    /// Journeys that arrived and were retired this tick.
    pub arrived: Vec<JourneyId>,
    /// Passengers that left origin countries.
    pub passengers_departed: u64,
    /// Passengers credited to destination countries.
    pub passengers_arrived: u64,
}

/// Keyed pool of journeys in flight.
#[derive(Debug, Clone)]
pub struct JourneyManager {
    airports: Vec<Airport>,
    journeys: BTreeMap<JourneyId, Journey>,
    rng: StdRng,
    speed_km: f64,
    capacity: u64,
    max_in_flight: usize,
    warned_no_airports: bool,
}

impl JourneyManager {
    /// Create a manager over the selected airports.
    pub fn new(airports: Vec<Airport>, config: &JourneysConfig, seed: u64) -> Self {
        Self {
            airports,
            journeys: BTreeMap::new(),
            rng: StdRng::seed_from_u64(seed),
            speed_km: config.speed_km,
            capacity: config.capacity,
            max_in_flight: config.max_in_flight,
            warned_no_airports: false,
        }
    }

    /// Airports journeys fly between.
    pub fn airports(&self) -> &[Airport] {
        &self.airports
    }

    /// All journeys, in boarding order.
    pub fn journeys(&self) -> impl Iterator<Item = &Journey> {
        self.journeys.values()
    }

    /// Journeys currently in the air.
    pub fn in_flight(&self) -> impl Iterator<Item = &Journey> {
        self.journeys
            .values()
            .filter(|journey| journey.phase == JourneyPhase::InFlight)
    }

    /// Look up a journey.
    pub fn get(&self, id: &JourneyId) -> Option<&Journey> {
        self.journeys.get(id)
    }

    /// Number of journeys in the pool.
    pub fn len(&self) -> usize {
        self.journeys.len()
    }

    /// Whether the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.journeys.is_empty()
    }

    /// Passengers currently in the air, summed over all journeys.
    pub fn passengers_in_flight(&self) -> u64 {
        self.journeys
            .values()
            .fold(0_u64, |acc, j| acc.saturating_add(j.payload.boarded))
    }

    /// Carriers of bacon and sniffles currently in the air.
    pub fn carriers_in_flight(&self) -> (u64, u64) {
        self.journeys.values().fold((0_u64, 0_u64), |(b, s), j| {
            (
                b.saturating_add(j.payload.bacon_carriers()),
                s.saturating_add(j.payload.sniffles_carriers()),
            )
        })
    }

    /// Refill the pool, advance every journey and retire arrivals.
    ///
    /// # Errors
    ///
    /// Returns [`JourneyError`] if an airport's country is unknown to the
    /// population model or a ledger.
    pub fn tick(
        &mut self,
        population: &mut PopulationModel,
        bacon: &mut ResourceLedger,
        sniffles: &mut ResourceLedger,
    ) -> Result<JourneyTickReport, JourneyError> {
        let mut report = JourneyTickReport::default();

        while self.journeys.len() < self.max_in_flight {
            let Some(journey) = self.board(population, bacon, sniffles)? else {
                break;
            };
            report.boarded.push(journey.id);
            report.passengers_departed = report
                .passengers_departed
                .saturating_add(journey.payload.boarded);
            self.journeys.insert(journey.id, journey);
        }

        for journey in self.journeys.values_mut() {
            if journey.phase != JourneyPhase::InFlight {
                continue;
            }
            geodesic::advance(&mut journey.vehicle, &journey.path);
            if journey.vehicle.has_arrived(&journey.path) {
                journey.phase = JourneyPhase::Arrived;
            }
        }

        let arrived: Vec<JourneyId> = self
            .journeys
            .values()
            .filter(|journey| journey.phase == JourneyPhase::Arrived)
            .map(|journey| journey.id)
            .collect();
        for id in arrived {
            if let Some(journey) = self.journeys.remove(&id) {
                Self::disembark(&journey, population, bacon, sniffles)?;
                report.passengers_arrived = report
                    .passengers_arrived
                    .saturating_add(journey.payload.boarded);
                report.arrived.push(id);
            }
        }

        Ok(report)
    }

    /// Board a new journey, taking passengers out of the origin country.
    /// Returns `None` when no airports are available.
    fn board(
        &mut self,
        population: &mut PopulationModel,
        bacon: &mut ResourceLedger,
        sniffles: &mut ResourceLedger,
    ) -> Result<Option<Journey>, JourneyError> {
        let Some((from, to)) = choose_route(&self.airports, &mut self.rng) else {
            if !self.warned_no_airports {
                warn!("no airports available, journeys disabled");
                self.warned_no_airports = true;
            }
            return Ok(None);
        };
        let (Some(origin), Some(destination)) = (self.airports.get(from), self.airports.get(to))
        else {
            return Ok(None);
        };
        let (origin, destination) = (origin.clone(), destination.clone());

        let path = geodesic::build_path(origin.position, destination.position)?;
        let country = origin.country.clone();
        let payload = compute_payload(
            population.get_population(&country)?,
            bacon.get_amount(&country)?,
            sniffles.get_amount(&country)?,
            self.capacity,
        );
        let mut journey = Journey {
            id: JourneyId::new(),
            vehicle: Vehicle::new(&path, self.speed_km),
            path,
            payload,
            phase: JourneyPhase::Boarding,
            origin,
            destination,
        };

        population.migrate(&country, 0_i64.saturating_sub(to_i64(payload.boarded)))?;
        bacon.delta(&country, 0_i64.saturating_sub(to_i64(payload.bacon_carriers())))?;
        sniffles.delta(
            &country,
            0_i64.saturating_sub(to_i64(payload.sniffles_carriers())),
        )?;
        journey.phase = JourneyPhase::InFlight;

        debug!(
            journey = %journey.id,
            origin = %journey.origin.iata,
            destination = %journey.destination.iata,
            distance_km = journey.path.distance_km,
            boarded = payload.boarded,
            bacon = payload.bacon_carriers(),
            sniffles = payload.sniffles_carriers(),
            "journey boarded"
        );
        Ok(Some(journey))
    }

    fn disembark(
        journey: &Journey,
        population: &mut PopulationModel,
        bacon: &mut ResourceLedger,
        sniffles: &mut ResourceLedger,
    ) -> Result<(), JourneyError> {
        let country: &CountryCode = &journey.destination.country;
        let payload = journey.payload;
        population.migrate(country, to_i64(payload.boarded))?;
        bacon.delta(country, to_i64(payload.bacon_carriers()))?;
        sniffles.delta(country, to_i64(payload.sniffles_carriers()))?;
        debug!(
            journey = %journey.id,
            destination = %journey.destination.iata,
            arrived = payload.boarded,
            "journey arrived"
        );
        Ok(())
    }
}
