//! Integration tests for whole-simulation behaviour.
//!
//! These drive [`SimulationState`] through [`run_tick`] and the async
//! runner with small hand-built worlds and the bundled starting world,
//! checking the invariants that must hold across systems: population caps,
//! cross-border gating, apple mitigation and journey conservation.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use contagion_core::config::{CadenceConfig, SeedConfig, SimulationBoundsConfig, SimulationConfig};
use contagion_core::operator::{OperatorState, SimulationEndReason};
use contagion_core::provider::{DatasetId, StaticProvider, starting_world};
use contagion_core::runner::{NoOpCallback, run_simulation};
use contagion_core::snapshot::build_snapshot;
use contagion_core::state::SimulationState;
use contagion_core::tick::run_tick;
use contagion_models::ResourceModel;
use contagion_types::{CountryCode, ResourceKind};

fn code(raw: &str) -> CountryCode {
    CountryCode::new(raw).unwrap()
}

fn seed(resource: ResourceKind, country: &str, amount: u64) -> SeedConfig {
    SeedConfig {
        resource,
        country: code(country),
        amount,
    }
}

/// Resources every tick, nothing else.
const fn resources_only() -> CadenceConfig {
    CadenceConfig {
        population_every: 1_000_000,
        resources_every: 1,
        journeys_every: 1_000_000,
    }
}

fn two_countries(za_population: f64, bordered: bool) -> StaticProvider {
    let provider = StaticProvider::new(vec![code("ZA"), code("BW")])
        .with_value(DatasetId::PopulationTotal, 2022, code("ZA"), za_population)
        .with_value(DatasetId::PopulationTotal, 2022, code("BW"), 1_000.0);
    if bordered {
        provider.with_border(code("ZA"), code("BW"))
    } else {
        provider
    }
}

fn amount(state: &SimulationState, kind: ResourceKind, country: &str) -> u64 {
    state.ledger(kind).get_amount(&code(country)).unwrap()
}

// ---------------------------------------------------------------------------
// Spread
// ---------------------------------------------------------------------------

#[test]
fn isolated_country_only_grows_internally() {
    let mut config = SimulationConfig::default();
    config.cadence = resources_only();
    config.seeds = vec![seed(ResourceKind::Bacon, "ZA", 100)];
    let mut state = SimulationState::initialize(&config, &two_countries(200.0, false)).unwrap();

    run_tick(&mut state).unwrap();

    // ceil(100 * 1.01) = 101, and BW is untouched.
    assert_eq!(amount(&state, ResourceKind::Bacon, "ZA"), 101);
    assert_eq!(amount(&state, ResourceKind::Bacon, "BW"), 0);
}

#[test]
fn country_above_threshold_exports_to_neighbour() {
    let mut config = SimulationConfig::default();
    config.cadence = resources_only();
    config.seeds = vec![seed(ResourceKind::Bacon, "ZA", 100)];
    let mut state = SimulationState::initialize(&config, &two_countries(200.0, true)).unwrap();

    let summary = run_tick(&mut state).unwrap();

    // ZA holds 50% of its population, above the 20% threshold.
    assert_eq!(amount(&state, ResourceKind::Bacon, "ZA"), 101);
    // ceil(101 * 0.001) = 1
    assert_eq!(amount(&state, ResourceKind::Bacon, "BW"), 1);
    let bacon = summary
        .reports
        .iter()
        .find(|r| r.kind == ResourceKind::Bacon)
        .unwrap();
    assert_eq!(bacon.exporters, vec![code("ZA")]);
}

#[test]
fn country_below_threshold_does_not_export() {
    let mut config = SimulationConfig::default();
    config.cadence = resources_only();
    config.seeds = vec![seed(ResourceKind::Bacon, "ZA", 100)];
    let mut state =
        SimulationState::initialize(&config, &two_countries(1_000_000.0, true)).unwrap();

    for _ in 0..10 {
        run_tick(&mut state).unwrap();
    }
    assert_eq!(amount(&state, ResourceKind::Bacon, "BW"), 0);
}

#[test]
fn sniffles_grow_and_apples_mitigate() {
    let provider = StaticProvider::new(vec![code("ZA")])
        .with_value(DatasetId::PopulationTotal, 2022, code("ZA"), 1_000_000.0)
        .with_value(DatasetId::PreventableDeaths, 2019, code("ZA"), 10.0);
    let mut config = SimulationConfig::default();
    config.cadence = resources_only();
    config.seeds = vec![seed(ResourceKind::Sniffles, "ZA", 10)];
    let mut state = SimulationState::initialize(&config, &provider).unwrap();

    run_tick(&mut state).unwrap();
    // Prophylaxis factor 1: ceil(10 * 1.01) = 11.
    assert_eq!(amount(&state, ResourceKind::Sniffles, "ZA"), 11);

    // Potential sniffles next tick: ceil(11 * 1.01) = 12; 5 apples cure 5.
    state.apples.ledger_mut().set(&code("ZA"), 5).unwrap();
    run_tick(&mut state).unwrap();
    assert_eq!(amount(&state, ResourceKind::Sniffles, "ZA"), 7);
    assert_eq!(amount(&state, ResourceKind::Apples, "ZA"), 0);
}

#[test]
fn capped_resources_never_exceed_population() {
    let mut config = SimulationConfig::default();
    config.cadence = CadenceConfig {
        population_every: 50,
        resources_every: 1,
        journeys_every: 1,
    };
    config.seeds = vec![
        seed(ResourceKind::Bacon, "ZA", 20_000_000),
        seed(ResourceKind::Sniffles, "CD", 40_000_000),
        seed(ResourceKind::Smiles, "LS", 2_000_000),
    ];
    let mut state = SimulationState::initialize(&config, &starting_world().unwrap()).unwrap();

    for _ in 0..400 {
        run_tick(&mut state).unwrap();
        let snapshot = build_snapshot(&state).unwrap();
        for country in &snapshot.countries {
            assert!(country.bacon.amount <= country.population, "{}", country.code);
            assert!(country.sniffles.amount <= country.population, "{}", country.code);
            assert!(country.smiles.amount <= country.population, "{}", country.code);
            assert!(country.bacon.percentage <= 100);
        }
    }
    // Bacon crossed into ZA's neighbours.
    assert!(amount(&state, ResourceKind::Bacon, "BW") > 0);
}

#[test]
fn shrinking_population_clamps_between_resource_ticks() {
    let provider = StaticProvider::new(vec![code("ZA")])
        .with_value(DatasetId::PopulationTotal, 2022, code("ZA"), 1_000_000.0)
        .with_value(DatasetId::PopulationGrowth, 2022, code("ZA"), -365_000.0);
    let mut config = SimulationConfig::default();
    config.cadence = CadenceConfig {
        population_every: 1,
        resources_every: 1_000,
        journeys_every: 1_000,
    };
    config.seeds = vec![
        seed(ResourceKind::Bacon, "ZA", 1_000_000),
        seed(ResourceKind::Sniffles, "ZA", 1_000_000),
        seed(ResourceKind::Smiles, "ZA", 1_000_000),
    ];
    let mut state = SimulationState::initialize(&config, &provider).unwrap();
    let start = state.population.get_population(&code("ZA")).unwrap();
    assert_eq!(amount(&state, ResourceKind::Bacon, "ZA"), start);

    for _ in 0..10 {
        let summary = run_tick(&mut state).unwrap();
        assert!(summary.population_updated);
        assert!(!summary.resources_ran());

        let population = state.population.get_population(&code("ZA")).unwrap();
        for kind in [ResourceKind::Bacon, ResourceKind::Sniffles, ResourceKind::Smiles] {
            assert_eq!(amount(&state, kind, "ZA"), population, "{kind}");
        }
    }
    assert!(state.population.get_population(&code("ZA")).unwrap() < start);
}

// ---------------------------------------------------------------------------
// Journeys
// ---------------------------------------------------------------------------

#[test]
fn journeys_conserve_people_and_carriers() {
    let mut config = SimulationConfig::default();
    config.cadence = CadenceConfig {
        population_every: 1_000_000,
        resources_every: 1_000_000,
        journeys_every: 1,
    };
    config.journeys.max_in_flight = 5;
    config.seeds = vec![
        seed(ResourceKind::Bacon, "ZA", 30_000_000),
        seed(ResourceKind::Sniffles, "ZA", 20_000_000),
        seed(ResourceKind::Bacon, "US", 100_000_000),
    ];
    let mut state = SimulationState::initialize(&config, &starting_world().unwrap()).unwrap();

    let people = state.population.total();
    let bacon = state.ledger(ResourceKind::Bacon).total();
    let sniffles = state.ledger(ResourceKind::Sniffles).total();
    let mut arrivals = 0_usize;

    for _ in 0..300 {
        let summary = run_tick(&mut state).unwrap();
        arrivals = arrivals.saturating_add(summary.journeys.unwrap().arrived.len());

        let (bacon_in_flight, sniffles_in_flight) = state.journeys.carriers_in_flight();
        assert_eq!(
            state
                .population
                .total()
                .saturating_add(state.journeys.passengers_in_flight()),
            people
        );
        assert_eq!(
            state
                .ledger(ResourceKind::Bacon)
                .total()
                .saturating_add(bacon_in_flight),
            bacon
        );
        assert_eq!(
            state
                .ledger(ResourceKind::Sniffles)
                .total()
                .saturating_add(sniffles_in_flight),
            sniffles
        );
        assert!(state.journeys.len() <= 5);
    }
    assert!(arrivals > 0);
}

#[test]
fn journeys_are_disabled_without_airports() {
    let mut config = SimulationConfig::default();
    config.cadence.journeys_every = 1;
    config.seeds.clear();
    let mut state = SimulationState::initialize(&config, &two_countries(200.0, true)).unwrap();

    for _ in 0..10 {
        let summary = run_tick(&mut state).unwrap();
        assert!(summary.journeys.unwrap().boarded.is_empty());
    }
    assert!(state.journeys.is_empty());
}

// ---------------------------------------------------------------------------
// Initialization and runner
// ---------------------------------------------------------------------------

#[test]
fn dataset_with_gaps_initializes() {
    let json = r#"{
        "countries": ["ZA", "LS", "CD"],
        "values": {
            "population_total": { "2022": { "ZA": 1000, "LS": null } },
            "preventable_deaths": { "2019": { "ZA": 20.0, "CD": null } }
        },
        "borders": { "ZA": ["LS"] }
    }"#;
    let provider = StaticProvider::from_json_str(json).unwrap();
    let state = SimulationState::initialize(&SimulationConfig::default(), &provider).unwrap();

    assert_eq!(state.population.get_population(&code("LS")).unwrap(), 0);
    assert_eq!(state.population.get_population(&code("CD")).unwrap(), 0);
    assert!(state.graph.is_symmetric());
    assert_eq!(state.graph.neighbors(&code("LS")).unwrap(), &[code("ZA")]);
    // Sniffles seeded in an empty country is capped away.
    assert_eq!(amount(&state, ResourceKind::Sniffles, "CD"), 0);

    let snapshot = build_snapshot(&state).unwrap();
    let ls = snapshot.country(&code("LS")).unwrap();
    assert_eq!(ls.bacon.percentage, 0);
    assert!(ls.population_magnitude.abs() < f64::EPSILON);
}

#[tokio::test]
async fn runner_stops_at_tick_limit() {
    let config = SimulationConfig::default();
    let mut state = SimulationState::initialize(&config, &starting_world().unwrap()).unwrap();
    let operator = Arc::new(OperatorState::new(0, &SimulationBoundsConfig { max_ticks: 30 }));

    let result = run_simulation(&mut state, &operator, &mut NoOpCallback)
        .await
        .unwrap();

    assert_eq!(result.end_reason, SimulationEndReason::MaxTicksReached);
    assert_eq!(result.total_ticks, 30);
    assert_eq!(state.tick(), 30);
    // Ten journey ticks at 100 km each.
    assert!(
        state
            .journeys
            .in_flight()
            .all(|j| j.vehicle.distance_traveled_km <= 1_000.0 + 1e-6)
    );
}
