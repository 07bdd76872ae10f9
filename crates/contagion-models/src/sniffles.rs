//! Sniffles: contagious spread slowed by prophylaxis and cured by apples.
//!
//! Per country, from the pre-tick amount:
//!
//! ```text
//! rate      = internal_rate / prophylaxis[c]
//! potential = ceil(amount * (1 + rate))
//! cured     = min(apples[c], potential)
//! sniffles  = min(potential - cured, population)
//! apples   -= cured
//! ```
//!
//! Cross-border export then follows the same threshold rule as bacon.

use contagion_ledger::ResourceLedger;
use contagion_types::{CountryCode, ResourceKind};
use contagion_world::numeric::to_i64;
use tracing::debug;

use crate::config::SnifflesConfig;
use crate::error::ModelError;
use crate::spread::{compute_exports, internal_growth, merge_imports};
use crate::{ResourceModel, TickContext, TickReport};

/// Sniffles spread model.
#[derive(Debug, Clone)]
pub struct SnifflesModel {
    ledger: ResourceLedger,
    config: SnifflesConfig,
}

impl SnifflesModel {
    /// Create the model with a zero ledger over `codes`.
    pub fn new<I>(codes: I, config: SnifflesConfig) -> Self
    where
        I: IntoIterator<Item = CountryCode>,
    {
        Self {
            ledger: ResourceLedger::new(ResourceKind::Sniffles, codes),
            config,
        }
    }

    /// Internal growth rate in a country after the prophylaxis adjustment.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::World`] if prophylaxis is attached but has no
    /// factor for the country.
    pub fn effective_rate(
        &self,
        ctx: &TickContext<'_>,
        code: &CountryCode,
    ) -> Result<f64, ModelError> {
        let factor = match ctx.prophylaxis {
            Some(prophylaxis) => prophylaxis.get_value(code)?,
            None => 1.0,
        };
        Ok(self.config.internal_rate / factor)
    }
}

impl ResourceModel for SnifflesModel {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Sniffles
    }

    fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }

    fn ledger_mut(&mut self) -> &mut ResourceLedger {
        &mut self.ledger
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) -> Result<TickReport, ModelError> {
        // Resolve every country before touching either ledger.
        let before = self.ledger.snapshot();
        let mut updates = Vec::with_capacity(before.len());
        for (code, amount) in before {
            let rate = self.effective_rate(ctx, &code)?;
            let potential = internal_growth(amount, rate);
            let cured = match ctx.apples.as_deref() {
                Some(apples) if self.config.mitigate_with_apples => {
                    apples.get_amount(&code)?.min(potential)
                }
                _ => 0,
            };
            let capped = ctx
                .population
                .cap_by_population(&code, potential.saturating_sub(cured))?;
            updates.push((code, capped, cured));
        }

        let mut cured_total = 0_u64;
        for (code, capped, cured) in &updates {
            if *cured > 0 {
                if let Some(apples) = ctx.apples.as_deref_mut() {
                    apples.delta(code, 0_i64.saturating_sub(to_i64(*cured)))?;
                }
                cured_total = cured_total.saturating_add(*cured);
            }
            self.ledger.set(code, *capped)?;
        }

        let params = self.config.spread();
        let after_internal = self.ledger.snapshot();
        let exports = compute_exports(ctx.graph, ctx.population, &after_internal, &params)?;
        let imported = merge_imports(&mut self.ledger, ctx.population, &exports.imports, true)?;

        let mut report = TickReport::new(ResourceKind::Sniffles);
        report.exporters = exports.exporters;
        report.imported = imported;
        report.cured = cured_total;
        report.total = self.ledger.total();
        debug!(
            total = report.total,
            cured = report.cured,
            exporters = report.exporters.len(),
            imported = report.imported,
            "sniffles tick"
        );
        Ok(report)
    }
}
