//! Render-sink snapshots of the simulation state.

use contagion_ledger::ResourceLedger;
use contagion_models::ModelError;
use contagion_types::{
    CountryCode, CountrySnapshot, ResourceKind, ResourceReading, VehicleSnapshot, WorldSnapshot,
};
use contagion_world::population::percentage;

use crate::journeys::Journey;
use crate::state::SimulationState;

/// Build the snapshot the presentation layer renders after a tick.
///
/// Countries are ordered by code; vehicles list every journey in flight.
///
/// # Errors
///
/// Returns [`ModelError`] if a ledger or the population model is missing
/// a country of the graph.
pub fn build_snapshot(state: &SimulationState) -> Result<WorldSnapshot, ModelError> {
    let countries = state
        .graph
        .codes()
        .map(|code| country_snapshot(state, code))
        .collect::<Result<Vec<_>, _>>()?;
    let vehicles = state.journeys.in_flight().map(vehicle_snapshot).collect();

    Ok(WorldSnapshot {
        tick: state.clock.tick(),
        date: state.clock.date(),
        countries,
        vehicles,
    })
}

fn country_snapshot(
    state: &SimulationState,
    code: &CountryCode,
) -> Result<CountrySnapshot, ModelError> {
    let population = state.population.get_population(code)?;
    let reading = |kind: ResourceKind| -> Result<ResourceReading, ModelError> {
        read(state.ledger(kind), code, population)
    };
    Ok(CountrySnapshot {
        code: code.clone(),
        population,
        population_magnitude: state.population.magnitude(code)?,
        prophylaxis: state.prophylaxis.get_value(code)?,
        bacon: reading(ResourceKind::Bacon)?,
        sniffles: reading(ResourceKind::Sniffles)?,
        smiles: reading(ResourceKind::Smiles)?,
        apples: reading(ResourceKind::Apples)?,
    })
}

fn read(
    ledger: &ResourceLedger,
    code: &CountryCode,
    population: u64,
) -> Result<ResourceReading, ModelError> {
    let amount = ledger.get_amount(code)?;
    Ok(ResourceReading {
        amount,
        percentage: percentage(amount, population),
    })
}

fn vehicle_snapshot(journey: &Journey) -> VehicleSnapshot {
    VehicleSnapshot {
        journey_id: journey.id,
        phase: journey.phase,
        origin: journey.origin.iata.clone(),
        destination: journey.destination.iata.clone(),
        position: journey.vehicle.position,
        bearing_deg: journey.vehicle.bearing_deg,
        altitude_km: journey.vehicle.altitude_km,
        distance_traveled_km: journey.vehicle.distance_traveled_km,
        distance_total_km: journey.path.distance_km,
        payload: journey.payload,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::provider::starting_world;
    use crate::tick::run_tick;

    fn code(raw: &str) -> CountryCode {
        CountryCode::new(raw).unwrap()
    }

    #[test]
    fn snapshot_lists_every_country_in_order() {
        let state =
            SimulationState::initialize(&SimulationConfig::default(), &starting_world().unwrap())
                .unwrap();
        let snapshot = build_snapshot(&state).unwrap();

        assert_eq!(snapshot.tick, 0);
        assert_eq!(snapshot.countries.len(), state.graph.len());
        assert!(snapshot.countries.windows(2).all(|w| match w {
            [a, b] => a.code < b.code,
            _ => false,
        }));

        let za = snapshot.country(&code("ZA")).unwrap();
        assert_eq!(za.bacon.amount, 1);
        assert_eq!(za.bacon.percentage, 0);
        assert!(za.population_magnitude > 7.0);
        assert!(snapshot.vehicles.is_empty());
    }

    #[test]
    fn snapshot_includes_vehicles_in_flight() {
        let mut state =
            SimulationState::initialize(&SimulationConfig::default(), &starting_world().unwrap())
                .unwrap();
        // Journeys run every third tick.
        for _ in 0..3 {
            run_tick(&mut state).unwrap();
        }
        let snapshot = build_snapshot(&state).unwrap();
        assert_eq!(snapshot.tick, 3);
        // A route shorter than one step lands on its boarding tick.
        assert_eq!(snapshot.vehicles.len(), state.journeys.len());
        for vehicle in &snapshot.vehicles {
            assert!(vehicle.distance_traveled_km <= vehicle.distance_total_km);
            assert!(vehicle.payload.boarded <= 100);
        }
    }
}
