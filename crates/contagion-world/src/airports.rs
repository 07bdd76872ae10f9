//! Airport filtering and random selection.
//!
//! The reference data lists thousands of airports. Only a handful per
//! continent are used as journey endpoints: [`usable_airports`] drops the
//! ones the simulation cannot fly to, then [`select_airports`] draws a fixed
//! number of large and medium airports per inhabited continent. Draws are
//! with replacement, so the same airport may appear more than once and is
//! then proportionally more likely to be picked as an endpoint.

use contagion_types::{Airport, AirportSize, Continent};
use rand::Rng;
use tracing::{debug, warn};

use crate::country_graph::CountryGraph;

/// Keep active airports with valid coordinates in a known country.
pub fn usable_airports(all: &[Airport], graph: &CountryGraph) -> Vec<Airport> {
    let usable: Vec<Airport> = all
        .iter()
        .filter(|airport| airport.active)
        .filter(|airport| airport.position.is_valid())
        .filter(|airport| graph.contains(&airport.country))
        .cloned()
        .collect();
    debug!(
        total = all.len(),
        usable = usable.len(),
        "filtered airport reference data"
    );
    usable
}

/// Draw `large_per_continent` large and `medium_per_continent` medium
/// airports from every inhabited continent.
///
/// Continents without candidates of a size are skipped with a warning.
pub fn select_airports<R: Rng>(
    usable: &[Airport],
    large_per_continent: usize,
    medium_per_continent: usize,
    rng: &mut R,
) -> Vec<Airport> {
    let mut selected = Vec::new();
    for continent in Continent::INHABITED {
        for (size, count) in [
            (AirportSize::Large, large_per_continent),
            (AirportSize::Medium, medium_per_continent),
        ] {
            let candidates: Vec<&Airport> = usable
                .iter()
                .filter(|a| a.continent == continent && a.size == size)
                .collect();
            if candidates.is_empty() {
                if count > 0 {
                    warn!(?continent, ?size, "no candidate airports");
                }
                continue;
            }
            for _ in 0..count {
                let index = rng.random_range(0..candidates.len());
                if let Some(airport) = candidates.get(index) {
                    selected.push((*airport).clone());
                }
            }
        }
    }
    selected
}

/// Pick an origin and a destination index into `airports`.
///
/// The destination differs from the origin whenever more than one airport
/// is available. Returns `None` for an empty list.
pub fn choose_route<R: Rng>(airports: &[Airport], rng: &mut R) -> Option<(usize, usize)> {
    let len = airports.len();
    if len == 0 {
        return None;
    }
    let origin = rng.random_range(0..len);
    if len == 1 {
        return Some((origin, origin));
    }
    // Draw from the other len - 1 slots and shift past the origin.
    let upper = len.saturating_sub(1);
    let mut destination = rng.random_range(0..upper);
    if destination >= origin {
        destination = destination.saturating_add(1);
    }
    Some((origin, destination))
}
