//! The tick driver.
//!
//! One call to [`run_tick`] advances the base clock by one tick and runs
//! every system that is due on the new tick, in a fixed order:
//!
//! 1. **Population** -- on a day boundary the population model moves to the
//!    clock's date and every capped ledger is clamped to the new totals.
//! 2. **Resources** -- apples, then bacon, then sniffles (which may consume
//!    apples), then smiles (which reads bacon and sniffles).
//! 3. **Journeys** -- board, advance and retire vehicles, then re-cap the
//!    capped ledgers, since smiles stay behind when their holders fly out.
//!
//! Systems never run concurrently; every tick sees the effects of the
//! systems that ran before it.

use chrono::NaiveDate;
use contagion_models::{ModelError, ResourceModel, TickContext, TickReport};
use tracing::debug;

use crate::clock::ClockError;
use crate::journeys::{JourneyError, JourneyTickReport};
use crate::state::SimulationState;

/// Errors that can occur while running a tick.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// The clock could not advance.
    #[error("clock error: {0}")]
    Clock(#[from] ClockError),

    /// A resource model failed.
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// The journey system failed.
    #[error("journey error: {0}")]
    Journey(#[from] JourneyError),
}

/// What happened during one base tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSummary {
    /// The tick that ran.
    pub tick: u64,
    /// Simulated date after the tick.
    pub date: NaiveDate,
    /// Whether the population model moved to a new date.
    pub population_updated: bool,
    /// Reports of the resource models, empty when they were not due.
    pub reports: Vec<TickReport>,
    /// Journey activity, `None` when journeys were not due or disabled.
    pub journeys: Option<JourneyTickReport>,
}

impl TickSummary {
    /// Whether the resource models ran on this tick.
    pub fn resources_ran(&self) -> bool {
        !self.reports.is_empty()
    }
}

/// Advance the simulation by one base tick.
///
/// # Errors
///
/// Returns [`TickError`] if the clock overflows or a system fails. The
/// state may be partially updated when a system fails.
pub fn run_tick(state: &mut SimulationState) -> Result<TickSummary, TickError> {
    let tick = state.clock.advance()?;
    let date = state.clock.date();

    let population_updated = state.clock.is_day_boundary();
    if population_updated {
        state.population.set_date(date);
        let lowered = state.enforce_population_cap()?;
        debug!(
            tick,
            %date,
            population = state.population.total(),
            lowered,
            "population date advanced"
        );
    }

    let reports = if state.cadence.resources_due(tick) {
        run_resource_models(state)?
    } else {
        Vec::new()
    };

    let journeys = if state.journeys_enabled && state.cadence.journeys_due(tick) {
        let report = state.journeys.tick(
            &mut state.population,
            state.bacon.ledger_mut(),
            state.sniffles.ledger_mut(),
        )?;
        if !report.boarded.is_empty() {
            state.enforce_population_cap()?;
        }
        Some(report)
    } else {
        None
    };

    Ok(TickSummary {
        tick,
        date,
        population_updated,
        reports,
        journeys,
    })
}

/// Tick the four resource models in dependency order.
fn run_resource_models(state: &mut SimulationState) -> Result<Vec<TickReport>, ModelError> {
    let SimulationState {
        graph,
        population,
        prophylaxis,
        apples,
        bacon,
        sniffles,
        smiles,
        ..
    } = state;
    let graph = &*graph;
    let population = &*population;

    let mut reports = Vec::with_capacity(4);
    {
        let mut ctx = TickContext::new(graph, population);
        reports.push(apples.tick(&mut ctx)?);
    }
    {
        let mut ctx = TickContext::new(graph, population);
        reports.push(bacon.tick(&mut ctx)?);
    }
    {
        let mut ctx = TickContext::new(graph, population)
            .with_prophylaxis(prophylaxis)
            .with_apples(apples.ledger_mut());
        reports.push(sniffles.tick(&mut ctx)?);
    }
    {
        let mut ctx =
            TickContext::new(graph, population).with_carriers(bacon.ledger(), sniffles.ledger());
        reports.push(smiles.tick(&mut ctx)?);
    }
    Ok(reports)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use contagion_types::{CountryCode, ResourceKind};

    use super::*;
    use crate::config::{CadenceConfig, SeedConfig, SimulationConfig};
    use crate::provider::{DatasetId, StaticProvider};

    fn code(raw: &str) -> CountryCode {
        CountryCode::new(raw).unwrap()
    }

    fn small_world(cadence: CadenceConfig) -> SimulationState {
        let provider = StaticProvider::new(vec![code("ZA"), code("BW"), code("CD")])
            .with_value(DatasetId::PopulationTotal, 2022, code("ZA"), 1_000_000.0)
            .with_value(DatasetId::PopulationTotal, 2022, code("BW"), 1_000_000.0)
            .with_value(DatasetId::PopulationTotal, 2022, code("CD"), 1_000_000.0)
            .with_border(code("ZA"), code("BW"));
        let mut config = SimulationConfig::default();
        config.cadence = cadence;
        config.seeds = vec![SeedConfig {
            resource: ResourceKind::Bacon,
            country: code("ZA"),
            amount: 10,
        }];
        SimulationState::initialize(&config, &provider).unwrap()
    }

    #[test]
    fn systems_run_on_their_periods() {
        let mut state = small_world(CadenceConfig {
            population_every: 4,
            resources_every: 2,
            journeys_every: 3,
        });

        let first = run_tick(&mut state).unwrap();
        assert_eq!(first.tick, 1);
        assert!(!first.resources_ran());
        assert!(first.journeys.is_none());
        assert!(!first.population_updated);

        let second = run_tick(&mut state).unwrap();
        assert!(second.resources_ran());
        assert_eq!(second.reports.len(), 4);
        assert_eq!(second.reports.first().unwrap().kind, ResourceKind::Apples);

        let third = run_tick(&mut state).unwrap();
        assert!(third.journeys.is_some());

        let fourth = run_tick(&mut state).unwrap();
        assert!(fourth.population_updated);
        assert_eq!(fourth.date, state.clock.start_date().succ_opt().unwrap());
        assert_eq!(state.population.date(), fourth.date);
    }

    #[test]
    fn resource_tick_grows_bacon() {
        let mut state = small_world(CadenceConfig {
            population_every: 1_000,
            resources_every: 1,
            journeys_every: 1_000,
        });
        run_tick(&mut state).unwrap();
        // ceil(10 * 1.01) = 11
        assert_eq!(state.bacon.ledger().get_amount(&code("ZA")).unwrap(), 11);
        assert_eq!(state.bacon.ledger().get_amount(&code("CD")).unwrap(), 0);
    }

    #[test]
    fn disabled_journeys_never_run() {
        let mut state = small_world(CadenceConfig {
            population_every: 1_000,
            resources_every: 1_000,
            journeys_every: 1,
        });
        state.journeys_enabled = false;
        for _ in 0..5 {
            assert!(run_tick(&mut state).unwrap().journeys.is_none());
        }
    }
}
