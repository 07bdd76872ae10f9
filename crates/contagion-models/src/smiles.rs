//! Smiles: internal growth pushed up by bacon and down by sniffles.
//!
//! Smiles never cross borders. Per country:
//!
//! ```text
//! base   = ceil(smiles * (1 + internal_rate))
//! factor = 1 - sniffles% / 100 + bacon% / 100
//! smiles = min(ceil(base * factor), population), floored at 0
//! ```
//!
//! The percentages are the integer population percentages of the most
//! recently committed bacon and sniffles ledgers. A missing ledger counts
//! as 0%.

use contagion_ledger::ResourceLedger;
use contagion_types::{CountryCode, ResourceKind};
use contagion_world::PopulationModel;
use contagion_world::numeric::{ceil_u64, to_f64};
use tracing::debug;

use crate::config::SmilesConfig;
use crate::error::ModelError;
use crate::spread::internal_growth;
use crate::{ResourceModel, TickContext, TickReport};

/// Smiles growth model.
#[derive(Debug, Clone)]
pub struct SmilesModel {
    ledger: ResourceLedger,
    config: SmilesConfig,
}

impl SmilesModel {
    /// Create the model with a zero ledger over `codes`.
    pub fn new<I>(codes: I, config: SmilesConfig) -> Self
    where
        I: IntoIterator<Item = CountryCode>,
    {
        Self {
            ledger: ResourceLedger::new(ResourceKind::Smiles, codes),
            config,
        }
    }

    /// Place `initial_per_country` smiles in every country, capped by
    /// population.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if a ledger country is unknown to the
    /// population model.
    pub fn seed_initial(&mut self, population: &PopulationModel) -> Result<(), ModelError> {
        let codes: Vec<CountryCode> = self.ledger.iter().map(|(code, _)| code.clone()).collect();
        for code in &codes {
            let amount = population.cap_by_population(code, self.config.initial_per_country)?;
            self.ledger.set(code, amount)?;
        }
        debug!(
            countries = codes.len(),
            per_country = self.config.initial_per_country,
            "smiles seeded"
        );
        Ok(())
    }
}

fn percentage(
    ledger: Option<&ResourceLedger>,
    code: &CountryCode,
    population: &PopulationModel,
) -> Result<f64, ModelError> {
    match ledger {
        Some(ledger) => Ok(f64::from(
            ledger.get_percentage_of_population(code, population)?,
        )),
        None => Ok(0.0),
    }
}

impl ResourceModel for SmilesModel {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Smiles
    }

    fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }

    fn ledger_mut(&mut self) -> &mut ResourceLedger {
        &mut self.ledger
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) -> Result<TickReport, ModelError> {
        let before = self.ledger.snapshot();
        for (code, amount) in &before {
            let pop = ctx.population.get_population(code)?;
            if pop == 0 {
                self.ledger.set(code, 0)?;
                continue;
            }
            let base = internal_growth(*amount, self.config.internal_rate);
            let bacon_pct = percentage(ctx.bacon, code, ctx.population)?;
            let sniffles_pct = percentage(ctx.sniffles, code, ctx.population)?;
            let factor = 1.0 - sniffles_pct / 100.0 + bacon_pct / 100.0;
            // ceil_u64 floors negatives at 0.
            let adjusted = ceil_u64(to_f64(base) * factor);
            self.ledger.set(code, adjusted.min(pop))?;
        }

        let mut report = TickReport::new(ResourceKind::Smiles);
        report.total = self.ledger.total();
        debug!(total = report.total, "smiles tick");
        Ok(report)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{code, world};

    fn carriers(bacon: u64, sniffles: u64) -> (ResourceLedger, ResourceLedger) {
        let mut b = ResourceLedger::new(ResourceKind::Bacon, vec![code("ZA")]);
        b.set(&code("ZA"), bacon).unwrap();
        let mut s = ResourceLedger::new(ResourceKind::Sniffles, vec![code("ZA")]);
        s.set(&code("ZA"), sniffles).unwrap();
        (b, s)
    }

    #[test]
    fn grows_without_carriers() {
        let (graph, population) = world(&[("ZA", 1_000)], &[]);
        let mut smiles = SmilesModel::new(graph.codes().cloned(), SmilesConfig::default());
        smiles.seed(&code("ZA"), 10).unwrap();

        let mut ctx = TickContext::new(&graph, &population);
        smiles.tick(&mut ctx).unwrap();
        assert_eq!(smiles.ledger().get_amount(&code("ZA")).unwrap(), 11);
    }

    #[test]
    fn bacon_raises_and_sniffles_lower() {
        let (graph, population) = world(&[("ZA", 1_000)], &[]);
        let (bacon, sniffles) = carriers(500, 200);
        let mut smiles = SmilesModel::new(graph.codes().cloned(), SmilesConfig::default());
        smiles.seed(&code("ZA"), 100).unwrap();

        let mut ctx = TickContext::new(&graph, &population).with_carriers(&bacon, &sniffles);
        smiles.tick(&mut ctx).unwrap();
        // base 101, factor 1 - 0.2 + 0.5 = 1.3 -> ceil(131.3).
        assert_eq!(smiles.ledger().get_amount(&code("ZA")).unwrap(), 132);
    }

    #[test]
    fn heavy_sniffles_shrink_smiles() {
        let (graph, population) = world(&[("ZA", 1_000)], &[]);
        let (bacon, sniffles) = carriers(100, 600);
        let mut smiles = SmilesModel::new(graph.codes().cloned(), SmilesConfig::default());
        smiles.seed(&code("ZA"), 100).unwrap();

        let mut ctx = TickContext::new(&graph, &population).with_carriers(&bacon, &sniffles);
        smiles.tick(&mut ctx).unwrap();
        // base 101, factor 0.5 -> ceil(50.5).
        assert_eq!(smiles.ledger().get_amount(&code("ZA")).unwrap(), 51);
    }

    #[test]
    fn capped_by_population() {
        let (graph, population) = world(&[("ZA", 120)], &[]);
        let (bacon, sniffles) = carriers(120, 0);
        let mut smiles = SmilesModel::new(graph.codes().cloned(), SmilesConfig::default());
        smiles.seed(&code("ZA"), 100).unwrap();

        let mut ctx = TickContext::new(&graph, &population).with_carriers(&bacon, &sniffles);
        smiles.tick(&mut ctx).unwrap();
        assert_eq!(smiles.ledger().get_amount(&code("ZA")).unwrap(), 120);
    }

    #[test]
    fn empty_country_has_no_smiles() {
        let (graph, population) = world(&[("ZA", 0)], &[]);
        let mut smiles = SmilesModel::new(graph.codes().cloned(), SmilesConfig::default());
        smiles.seed_initial(&population).unwrap();
        assert_eq!(smiles.ledger().get_amount(&code("ZA")).unwrap(), 0);

        let mut ctx = TickContext::new(&graph, &population);
        smiles.tick(&mut ctx).unwrap();
        assert_eq!(smiles.ledger().get_amount(&code("ZA")).unwrap(), 0);
    }

    #[test]
    fn initial_seed_in_every_country() {
        let (_graph, population) = world(&[("ZA", 10), ("BW", 10)], &[]);
        let config = SmilesConfig {
            initial_per_country: 3,
            ..SmilesConfig::default()
        };
        let mut smiles = SmilesModel::new(vec![code("ZA"), code("BW")], config);
        smiles.seed_initial(&population).unwrap();
        assert_eq!(smiles.ledger().total(), 6);
    }
}
