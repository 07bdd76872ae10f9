//! Resource diffusion models for the Contagion simulation.
//!
//! Each ledger-backed resource is driven by a model implementing
//! [`ResourceModel`]. A model owns its [`ResourceLedger`] and updates it
//! once per resource tick from the graph, the population model and
//! whatever other ledgers the [`TickContext`] hands it.
//!
//! # Modules
//!
//! - [`spread`] -- Internal growth and threshold-gated cross-border export.
//! - [`bacon`] -- [`BaconModel`]: threshold or neighbour-adoption spread.
//! - [`sniffles`] -- [`SnifflesModel`]: prophylaxis-slowed spread, apple cures.
//! - [`smiles`] -- [`SmilesModel`]: growth pushed up by bacon, down by sniffles.
//! - [`apples`] -- [`ApplesModel`]: production from annual harvests.
//! - [`prophylaxis`] -- [`Prophylaxis`]: constant per-country spread divisor.
//! - [`config`] -- Per-model parameters ([`ModelsConfig`]).
//! - [`error`] -- [`ModelError`].
//!
//! # Tick order
//!
//! Within one resource tick the driver runs apples, bacon, sniffles, then
//! smiles. Each model sees the most recently committed state of the
//! others, so sniffles mitigates against this tick's apples and smiles
//! reacts to this tick's bacon and sniffles.

pub mod apples;
pub mod bacon;
pub mod config;
pub mod error;
pub mod prophylaxis;
pub mod smiles;
pub mod sniffles;
pub mod spread;

// Re-export primary types at crate root.
pub use apples::ApplesModel;
pub use bacon::BaconModel;
pub use config::{
    ApplesConfig, BaconConfig, BaconSpreadMode, ModelsConfig, ProphylaxisConfig, SmilesConfig,
    SnifflesConfig, SpreadParams,
};
pub use error::ModelError;
pub use prophylaxis::Prophylaxis;
pub use smiles::SmilesModel;
pub use sniffles::SnifflesModel;

use contagion_ledger::ResourceLedger;
use contagion_types::{CountryCode, ResourceKind};
use contagion_world::{CountryGraph, PopulationModel};

// ---------------------------------------------------------------------------
// Tick context
// ---------------------------------------------------------------------------

/// Everything a model may read (or, for apples, write) during its tick.
///
/// Built fresh by the tick driver for each model so that borrows of other
/// models' ledgers never overlap with the ticking model's own ledger.
pub struct TickContext<'a> {
    /// Border graph.
    pub graph: &'a CountryGraph,
    /// Population on the current simulated date.
    pub population: &'a PopulationModel,
    /// Prophylaxis factors; sniffles treats a missing table as factor 1.
    pub prophylaxis: Option<&'a Prophylaxis>,
    /// Most recently committed bacon amounts, read by smiles.
    pub bacon: Option<&'a ResourceLedger>,
    /// Most recently committed sniffles amounts, read by smiles.
    pub sniffles: Option<&'a ResourceLedger>,
    /// Apple stock consumed by sniffles mitigation.
    pub apples: Option<&'a mut ResourceLedger>,
}

impl<'a> TickContext<'a> {
    /// Context with only the graph and the population model.
    pub const fn new(graph: &'a CountryGraph, population: &'a PopulationModel) -> Self {
        Self {
            graph,
            population,
            prophylaxis: None,
            bacon: None,
            sniffles: None,
            apples: None,
        }
    }

    /// Attach prophylaxis factors.
    #[must_use]
    pub const fn with_prophylaxis(mut self, prophylaxis: &'a Prophylaxis) -> Self {
        self.prophylaxis = Some(prophylaxis);
        self
    }

    /// Attach the committed bacon and sniffles ledgers.
    #[must_use]
    pub const fn with_carriers(
        mut self,
        bacon: &'a ResourceLedger,
        sniffles: &'a ResourceLedger,
    ) -> Self {
        self.bacon = Some(bacon);
        self.sniffles = Some(sniffles);
        self
    }

    /// Attach the apple ledger for mitigation.
    #[must_use]
    pub const fn with_apples(mut self, apples: &'a mut ResourceLedger) -> Self {
        self.apples = Some(apples);
        self
    }
}

// ---------------------------------------------------------------------------
// Tick report
// ---------------------------------------------------------------------------

/// What a single model tick did.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TickReport {
    /// Resource the model drives.
    pub kind: ResourceKind,
    /// Countries that exported across a border this tick.
    pub exporters: Vec<CountryCode>,
    /// Units credited to neighbours (after population caps).
    pub imported: u64,
    /// Sniffles removed by apples this tick.
    pub cured: u64,
    /// Ledger total after the tick.
    pub total: u64,
}

impl TickReport {
    /// Empty report for a model.
    pub const fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            exporters: Vec::new(),
            imported: 0,
            cured: 0,
            total: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Model trait
// ---------------------------------------------------------------------------

/// A per-resource update rule over the country graph.
pub trait ResourceModel {
    /// Resource this model drives.
    fn kind(&self) -> ResourceKind;

    /// The model's ledger.
    fn ledger(&self) -> &ResourceLedger;

    /// Mutable access to the model's ledger, used for seeding and journeys.
    fn ledger_mut(&mut self) -> &mut ResourceLedger;

    /// Advance the resource by one tick and commit the result.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if a country is unknown to the ledger, the
    /// graph or the population model.
    fn tick(&mut self, ctx: &mut TickContext<'_>) -> Result<TickReport, ModelError>;

    /// Add `amount` units in a country.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Ledger`] if the country is unknown.
    fn seed(&mut self, code: &CountryCode, amount: u64) -> Result<(), ModelError> {
        self.ledger_mut().seed(code, amount)?;
        Ok(())
    }

    /// Amount in a country as an integer percentage of its population.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if the country is unknown.
    fn percentage_of(
        &self,
        code: &CountryCode,
        population: &PopulationModel,
    ) -> Result<u32, ModelError> {
        Ok(self.ledger().get_percentage_of_population(code, population)?)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Small worlds shared by the model tests.

    #![allow(clippy::unwrap_used)]

    use chrono::NaiveDate;
    use contagion_types::CountryCode;
    use contagion_world::{CountryGraph, PopulationModel};

    pub fn code(raw: &str) -> CountryCode {
        CountryCode::new(raw).unwrap()
    }

    pub fn epoch() -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 1, 1).unwrap()
    }

    /// Countries with zero growth, optionally linked both ways.
    pub fn world(
        populations: &[(&str, u64)],
        borders: &[(&str, &str)],
    ) -> (CountryGraph, PopulationModel) {
        let mut graph = CountryGraph::new(populations.iter().map(|(c, _)| code(c))).unwrap();
        for (a, b) in borders {
            graph.add_border(&code(a), &code(b)).unwrap();
            graph.add_border(&code(b), &code(a)).unwrap();
        }
        let mut population = PopulationModel::new(epoch(), epoch());
        for (c, total) in populations {
            population.insert(code(c), *total, 0.0).unwrap();
        }
        (graph, population)
    }
}
