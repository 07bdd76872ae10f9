//! Bacon: spreads within countries and over borders.
//!
//! Two rules are available, chosen by [`BaconSpreadMode`]:
//!
//! - **Threshold** (default): internal growth at a constant rate, then
//!   threshold-gated cross-border export, see [`crate::spread`].
//! - **Neighbour adoption**: no internal growth; every country bordering a
//!   country that holds any bacon gains a flat increment, capped by
//!   population.

use std::collections::BTreeMap;

use contagion_ledger::ResourceLedger;
use contagion_types::{CountryCode, ResourceKind};
use tracing::debug;

use crate::config::{BaconConfig, BaconSpreadMode};
use crate::error::ModelError;
use crate::spread::{compute_exports, internal_growth, merge_imports};
use crate::{ResourceModel, TickContext, TickReport};

/// Bacon spread model.
#[derive(Debug, Clone)]
pub struct BaconModel {
    ledger: ResourceLedger,
    config: BaconConfig,
}

impl BaconModel {
    /// Create the model with a zero ledger over `codes`.
    pub fn new<I>(codes: I, config: BaconConfig) -> Self
    where
        I: IntoIterator<Item = CountryCode>,
    {
        Self {
            ledger: ResourceLedger::new(ResourceKind::Bacon, codes),
            config,
        }
    }

    /// Active spread rule.
    pub const fn mode(&self) -> BaconSpreadMode {
        self.config.mode
    }

    fn tick_threshold(&mut self, ctx: &TickContext<'_>) -> Result<TickReport, ModelError> {
        let params = self.config.spread();
        let before = self.ledger.snapshot();
        for (code, amount) in &before {
            let grown = internal_growth(*amount, params.internal_rate);
            let capped = ctx.population.cap_by_population(code, grown)?;
            self.ledger.set(code, capped)?;
        }

        let after_internal = self.ledger.snapshot();
        let exports = compute_exports(ctx.graph, ctx.population, &after_internal, &params)?;
        let imported = merge_imports(&mut self.ledger, ctx.population, &exports.imports, true)?;

        let mut report = TickReport::new(ResourceKind::Bacon);
        report.exporters = exports.exporters;
        report.imported = imported;
        Ok(report)
    }

    fn tick_adoption(&mut self, ctx: &TickContext<'_>) -> Result<TickReport, ModelError> {
        let mut imports: BTreeMap<CountryCode, u64> = BTreeMap::new();
        let mut exporters = Vec::new();
        for (code, amount) in self.ledger.iter() {
            if amount == 0 {
                continue;
            }
            let neighbours = ctx.graph.neighbors(code)?;
            if neighbours.is_empty() {
                continue;
            }
            for neighbour in neighbours {
                imports.insert(neighbour.clone(), self.config.adoption_increment);
            }
            exporters.push(code.clone());
        }
        let imported = merge_imports(&mut self.ledger, ctx.population, &imports, true)?;

        let mut report = TickReport::new(ResourceKind::Bacon);
        report.exporters = exporters;
        report.imported = imported;
        Ok(report)
    }
}

impl ResourceModel for BaconModel {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Bacon
    }

    fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }

    fn ledger_mut(&mut self) -> &mut ResourceLedger {
        &mut self.ledger
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) -> Result<TickReport, ModelError> {
        let mut report = match self.config.mode {
            BaconSpreadMode::Threshold => self.tick_threshold(ctx)?,
            BaconSpreadMode::NeighborAdoption => self.tick_adoption(ctx)?,
        };
        report.total = self.ledger.total();
        debug!(
            mode = ?self.config.mode,
            total = report.total,
            exporters = report.exporters.len(),
            imported = report.imported,
            "bacon tick"
        );
        Ok(report)
    }
}
