//! Spread primitives shared by the bacon and sniffles models.
//!
//! A spreading tick has two phases:
//!
//! 1. **Internal spread**: every country grows from its own pre-tick amount,
//!    `ceil(amount * (1 + rate))`, capped by population.
//! 2. **Cross-border spread**: every country whose population percentage is
//!    strictly above the threshold sends `ceil(amount * external_rate)` to
//!    *each* neighbour. Exports are computed from the post-internal amounts
//!    into a separate map and merged afterwards, so the order countries are
//!    visited in never matters. Exporters are not debited.

use std::collections::BTreeMap;

use contagion_ledger::ResourceLedger;
use contagion_types::CountryCode;
use contagion_world::numeric::{ceil_u64, to_f64, to_i64};
use contagion_world::{CountryGraph, PopulationModel};

use crate::config::SpreadParams;
use crate::error::ModelError;

/// `ceil(amount * (1 + rate))`.
pub fn internal_growth(amount: u64, rate: f64) -> u64 {
    ceil_u64(to_f64(amount) * (1.0 + rate))
}

/// Cross-border transfers computed for one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exports {
    /// Units owed to each importing country, before population caps.
    pub imports: BTreeMap<CountryCode, u64>,
    /// Countries that sent at least one unit.
    pub exporters: Vec<CountryCode>,
}

/// Compute threshold-gated exports from a post-internal snapshot.
///
/// # Errors
///
/// Returns [`ModelError::World`] if a country in `amounts` is unknown to
/// the graph or the population model.
pub fn compute_exports(
    graph: &CountryGraph,
    population: &PopulationModel,
    amounts: &BTreeMap<CountryCode, u64>,
    params: &SpreadParams,
) -> Result<Exports, ModelError> {
    let mut exports = Exports::default();
    for (code, amount) in amounts {
        let neighbours = graph.neighbors(code)?;
        if neighbours.is_empty() {
            continue;
        }
        let pct = population.get_percentage(code, *amount)?;
        if pct <= params.external_threshold_pct {
            continue;
        }
        let outgoing = ceil_u64(to_f64(*amount) * params.external_rate);
        if outgoing == 0 {
            continue;
        }
        for neighbour in neighbours {
            let owed = exports.imports.entry(neighbour.clone()).or_insert(0);
            *owed = owed.saturating_add(outgoing);
        }
        exports.exporters.push(code.clone());
    }
    Ok(exports)
}

/// Credit imports to a ledger, capping each country by population when
/// `capped` is set. Returns the units actually credited.
///
/// # Errors
///
/// Returns [`ModelError`] if an importing country is unknown.
pub fn merge_imports(
    ledger: &mut ResourceLedger,
    population: &PopulationModel,
    imports: &BTreeMap<CountryCode, u64>,
    capped: bool,
) -> Result<u64, ModelError> {
    let mut credited = 0_u64;
    for (code, owed) in imports {
        let current = ledger.get_amount(code)?;
        let mut target = current.saturating_add(*owed);
        if capped {
            target = population.cap_by_population(code, target)?;
        }
        let added = target.saturating_sub(current);
        if added > 0 {
            ledger.migrate(code, to_i64(added))?;
            credited = credited.saturating_add(added);
        }
    }
    Ok(credited)
}
