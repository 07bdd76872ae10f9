//! Apples: produced from annual harvests, consumed curing sniffles.
//!
//! Apples never spread and are not capped by population. Each tick every
//! country with production data gains
//! `ceil(tonnes * apples_per_tonne / days_per_year * days_per_tick)`.

use std::collections::BTreeMap;

use contagion_ledger::ResourceLedger;
use contagion_types::{CountryCode, ResourceKind};
use contagion_world::numeric::{ceil_u64, to_i64};
use tracing::{debug, warn};

use crate::config::ApplesConfig;
use crate::error::ModelError;
use crate::{ResourceModel, TickContext, TickReport};

/// Apple production model.
#[derive(Debug, Clone)]
pub struct ApplesModel {
    ledger: ResourceLedger,
    annual_production: BTreeMap<CountryCode, f64>,
    config: ApplesConfig,
}

impl ApplesModel {
    /// Create the model over `codes` with annual production in tonnes.
    ///
    /// Production for countries outside `codes`, and non-finite or
    /// non-positive figures, are dropped.
    pub fn new<I>(codes: I, annual_production: &BTreeMap<CountryCode, f64>, config: ApplesConfig) -> Self
    where
        I: IntoIterator<Item = CountryCode>,
    {
        let ledger = ResourceLedger::new(ResourceKind::Apples, codes);
        let mut production = BTreeMap::new();
        for (code, tonnes) in annual_production {
            if !ledger.contains(code) {
                warn!(country = %code, "apple production for unknown country dropped");
                continue;
            }
            if tonnes.is_finite() && *tonnes > 0.0 {
                production.insert(code.clone(), *tonnes);
            }
        }
        debug!(producers = production.len(), "apple production loaded");
        Self {
            ledger,
            annual_production: production,
            config,
        }
    }

    /// Apples a country gains per tick.
    pub fn production_per_tick(&self, code: &CountryCode) -> u64 {
        self.annual_production
            .get(code)
            .map_or(0, |tonnes| ceil_u64(tonnes * self.config.per_tick_factor()))
    }

    /// Annual production in tonnes, if the country produces apples.
    pub fn annual_production(&self, code: &CountryCode) -> Option<f64> {
        self.annual_production.get(code).copied()
    }
}

impl ResourceModel for ApplesModel {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Apples
    }

    fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }

    fn ledger_mut(&mut self) -> &mut ResourceLedger {
        &mut self.ledger
    }

    fn tick(&mut self, _ctx: &mut TickContext<'_>) -> Result<TickReport, ModelError> {
        let producers: Vec<CountryCode> = self.annual_production.keys().cloned().collect();
        for code in &producers {
            let produced = self.production_per_tick(code);
            if produced > 0 {
                self.ledger.delta(code, to_i64(produced))?;
            }
        }
        let mut report = TickReport::new(ResourceKind::Apples);
        report.total = self.ledger.total();
        Ok(report)
    }
}
