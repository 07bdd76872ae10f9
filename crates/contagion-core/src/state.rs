//! Simulation state and the initialization phase.
//!
//! [`SimulationState`] owns everything a tick touches: the clock, the
//! border graph, the population model, prophylaxis, the four resource
//! models and the journey manager. It is built once, synchronously, by
//! [`SimulationState::initialize`] from a [`SimulationConfig`] and a
//! [`DataProvider`]; afterwards the tick driver mutates it in place.
//!
//! # Initialization order
//!
//! 1. Country set and border graph.
//! 2. Population totals and growth ([`Fallback::Zero`]).
//! 3. Prophylaxis from preventable deaths ([`Fallback::MaxFinite`]).
//! 4. Apple production ([`Fallback::Zero`]).
//! 5. Airports: filtered, then drawn per continent with a seeded RNG.
//! 6. Ledgers, initial smiles, then the configured seeds.

use contagion_ledger::ResourceLedger;
use contagion_models::{
    ApplesModel, BaconModel, ModelError, Prophylaxis, ResourceModel, SmilesModel, SnifflesModel,
};
use contagion_types::{CountryCode, ResourceKind};
use contagion_world::numeric::round_u64;
use contagion_world::{CountryGraph, PopulationModel, WorldError, select_airports, usable_airports};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::clock::{Cadence, ClockError, WorldClock};
use crate::config::{JourneysConfig, SeedConfig, SimulationConfig};
use crate::journeys::JourneyManager;
use crate::provider::{DataProvider, DatasetId, Fallback, ProviderError, fill_missing};

/// Errors that can occur while building the initial state.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    /// The provider failed.
    #[error("data provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Building the graph or population model failed.
    #[error("world error: {0}")]
    World(#[from] WorldError),

    /// Seeding a model failed.
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// The cadence or clock configuration is invalid.
    #[error("clock error: {0}")]
    Clock(#[from] ClockError),

    /// The journey fleet settings cannot move vehicles.
    #[error("invalid journey configuration: {reason}")]
    InvalidJourneys {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },

    /// The provider returned no countries.
    #[error("provider returned no countries")]
    EmptyCountrySet,

    /// A configured seed names a country outside the country set.
    #[error("seed for {resource} names unknown country {country}")]
    UnknownSeedCountry {
        /// Resource being seeded.
        resource: ResourceKind,
        /// The unknown country.
        country: CountryCode,
    },
}

/// The complete mutable state of a running simulation.
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Base tick counter and calendar.
    pub clock: WorldClock,
    /// Per-system periods.
    pub cadence: Cadence,
    /// Border graph.
    pub graph: CountryGraph,
    /// Population on the current simulated date.
    pub population: PopulationModel,
    /// Constant per-country sniffles divisor.
    pub prophylaxis: Prophylaxis,
    /// Apple production and stock.
    pub apples: ApplesModel,
    /// Bacon spread.
    pub bacon: BaconModel,
    /// Sniffles spread.
    pub sniffles: SnifflesModel,
    /// Smiles growth.
    pub smiles: SmilesModel,
    /// Journeys in flight.
    pub journeys: JourneyManager,
    /// Whether the journey system runs.
    pub journeys_enabled: bool,
}

impl SimulationState {
    /// Load all provider data and build the initial state.
    ///
    /// # Errors
    ///
    /// Returns [`InitError`] if the provider fails, the country set is
    /// empty or contains duplicates, the cadence is invalid, or a seed
    /// names an unknown country. Missing indicator values are not errors.
    pub fn initialize(
        config: &SimulationConfig,
        provider: &dyn DataProvider,
    ) -> Result<Self, InitError> {
        let cadence = Cadence::new(&config.cadence)?;
        let clock = WorldClock::new(config.world.start_date, cadence.population_every())?;
        if config.journeys.enabled {
            validate_journeys(&config.journeys)?;
        }

        // --- Countries and borders ---
        let codes = provider.country_codes()?;
        if codes.is_empty() {
            return Err(InitError::EmptyCountrySet);
        }
        let borders = provider.load_borders()?;
        let graph = CountryGraph::from_borders(codes.iter().cloned(), &borders)?;

        // --- Population ---
        let data = &config.data;
        let totals = fill_missing(
            &provider.load_yearly_value(DatasetId::PopulationTotal, &codes, data.population_year)?,
            &codes,
            Fallback::Zero,
        );
        let growth = fill_missing(
            &provider.load_yearly_value(DatasetId::PopulationGrowth, &codes, data.population_year)?,
            &codes,
            Fallback::Zero,
        );
        let mut population = PopulationModel::new(config.world.epoch, config.world.start_date);
        for code in &codes {
            let total = totals.get(code).copied().map_or(0, round_u64);
            let annual_growth = growth.get(code).copied().unwrap_or(0.0);
            population.insert(code.clone(), total, annual_growth)?;
        }

        // --- Prophylaxis ---
        let deaths = fill_missing(
            &provider.load_yearly_value(DatasetId::PreventableDeaths, &codes, data.deaths_year)?,
            &codes,
            Fallback::MaxFinite,
        );
        let prophylaxis =
            Prophylaxis::from_death_rates(codes.iter().cloned(), &deaths, &config.models.prophylaxis);

        // --- Apples ---
        let production = fill_missing(
            &provider.load_yearly_value(DatasetId::AppleProduction, &codes, data.apples_year)?,
            &codes,
            Fallback::Zero,
        );
        let apples = ApplesModel::new(codes.iter().cloned(), &production, config.models.apples.clone());

        // --- Airports ---
        let mut rng = StdRng::seed_from_u64(config.world.seed);
        let usable = usable_airports(&provider.load_airports()?, &graph);
        let selected = select_airports(
            &usable,
            config.journeys.large_per_continent,
            config.journeys.medium_per_continent,
            &mut rng,
        );
        let journeys = JourneyManager::new(selected, &config.journeys, rng.random());

        // --- Ledgers and seeds ---
        let bacon = BaconModel::new(codes.iter().cloned(), config.models.bacon.clone());
        let sniffles = SnifflesModel::new(codes.iter().cloned(), config.models.sniffles.clone());
        let mut smiles = SmilesModel::new(codes.iter().cloned(), config.models.smiles.clone());
        smiles.seed_initial(&population)?;

        let mut state = Self {
            clock,
            cadence,
            graph,
            population,
            prophylaxis,
            apples,
            bacon,
            sniffles,
            smiles,
            journeys,
            journeys_enabled: config.journeys.enabled,
        };
        for seed in &config.seeds {
            state.apply_seed(seed)?;
        }

        info!(
            countries = state.graph.len(),
            borders = state.graph.border_count(),
            population = state.population.total(),
            airports = state.journeys.airports().len(),
            seeds = config.seeds.len(),
            "simulation initialized"
        );
        Ok(state)
    }

    /// Add a seed amount to a resource, capped by population for capped
    /// resources.
    ///
    /// # Errors
    ///
    /// Returns [`InitError::UnknownSeedCountry`] if the country is not in
    /// the country set.
    pub fn apply_seed(&mut self, seed: &SeedConfig) -> Result<(), InitError> {
        if !self.graph.contains(&seed.country) {
            return Err(InitError::UnknownSeedCountry {
                resource: seed.resource,
                country: seed.country.clone(),
            });
        }
        let population = &self.population;
        let model: &mut dyn ResourceModel = match seed.resource {
            ResourceKind::Bacon => &mut self.bacon,
            ResourceKind::Sniffles => &mut self.sniffles,
            ResourceKind::Smiles => &mut self.smiles,
            ResourceKind::Apples => &mut self.apples,
        };
        model.seed(&seed.country, seed.amount)?;
        if seed.resource.is_population_capped() {
            let current = model.ledger().get_amount(&seed.country).map_err(ModelError::from)?;
            let capped = population
                .cap_by_population(&seed.country, current)
                .map_err(ModelError::from)?;
            model
                .ledger_mut()
                .set(&seed.country, capped)
                .map_err(ModelError::from)?;
        }
        debug!(
            resource = %seed.resource,
            country = %seed.country,
            amount = seed.amount,
            "seed applied"
        );
        Ok(())
    }

    /// Clamp every population-capped ledger to the current population.
    ///
    /// Returns the number of country amounts that were lowered.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if a ledger and the population model disagree
    /// on the country set.
    pub fn enforce_population_cap(&mut self) -> Result<usize, ModelError> {
        let mut lowered = 0_usize;
        for kind in ResourceKind::ALL.into_iter().filter(|k| k.is_population_capped()) {
            let (population, ledger) = self.ledger_with_population(kind);
            for (code, amount) in ledger.snapshot() {
                let capped = population.cap_by_population(&code, amount)?;
                if capped < amount {
                    ledger.set(&code, capped)?;
                    lowered = lowered.saturating_add(1);
                }
            }
        }
        Ok(lowered)
    }

    /// A mutable ledger alongside the population it is capped by.
    fn ledger_with_population(
        &mut self,
        kind: ResourceKind,
    ) -> (&PopulationModel, &mut ResourceLedger) {
        let ledger = match kind {
            ResourceKind::Bacon => self.bacon.ledger_mut(),
            ResourceKind::Sniffles => self.sniffles.ledger_mut(),
            ResourceKind::Smiles => self.smiles.ledger_mut(),
            ResourceKind::Apples => self.apples.ledger_mut(),
        };
        (&self.population, ledger)
    }

    /// The ledger of a resource.
    pub fn ledger(&self, kind: ResourceKind) -> &ResourceLedger {
        match kind {
            ResourceKind::Bacon => self.bacon.ledger(),
            ResourceKind::Sniffles => self.sniffles.ledger(),
            ResourceKind::Smiles => self.smiles.ledger(),
            ResourceKind::Apples => self.apples.ledger(),
        }
    }

    /// Current base tick.
    pub const fn tick(&self) -> u64 {
        self.clock.tick()
    }
}

/// Reject fleet settings under which a vehicle could never land.
fn validate_journeys(config: &JourneysConfig) -> Result<(), InitError> {
    if !config.speed_km.is_finite() || config.speed_km <= 0.0 {
        return Err(InitError::InvalidJourneys {
            reason: format!("speed_km must be a positive number, got {}", config.speed_km),
        });
    }
    if config.capacity == 0 {
        return Err(InitError::InvalidJourneys {
            reason: "capacity must be at least 1".to_owned(),
        });
    }
    Ok(())
}
