//! The per-resource ledger: one whole-unit amount per country.

use std::collections::BTreeMap;

use contagion_types::{CountryCode, ResourceKind};
use contagion_world::PopulationModel;
use contagion_world::numeric::to_i64;
use tracing::{debug, trace};

use crate::LedgerError;

/// Amounts of a single resource across every country.
///
/// Constructed over the canonical country set with every amount at zero.
/// Amounts are unsigned, so the non-negativity invariant holds by
/// construction; signed updates are clamped at zero.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ResourceLedger {
    /// Resource this ledger tracks.
    kind: ResourceKind,
    /// Current amount per country.
    amounts: BTreeMap<CountryCode, u64>,
}

impl ResourceLedger {
    /// Create a ledger with a zero entry for every country.
    pub fn new<I>(kind: ResourceKind, codes: I) -> Self
    where
        I: IntoIterator<Item = CountryCode>,
    {
        Self {
            kind,
            amounts: codes.into_iter().map(|code| (code, 0)).collect(),
        }
    }

    /// Resource this ledger tracks.
    pub const fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Number of countries in the ledger.
    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    /// Whether the ledger has no countries.
    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    /// Whether the country has an entry.
    pub fn contains(&self, code: &CountryCode) -> bool {
        self.amounts.contains_key(code)
    }

    /// Iterate over `(country, amount)` pairs in code order.
    pub fn iter(&self) -> impl Iterator<Item = (&CountryCode, u64)> {
        self.amounts.iter().map(|(code, amount)| (code, *amount))
    }

    fn slot(&mut self, code: &CountryCode) -> Result<&mut u64, LedgerError> {
        let kind = self.kind;
        self.amounts
            .get_mut(code)
            .ok_or_else(|| LedgerError::UnknownCountry {
                kind,
                code: code.clone(),
            })
    }

    // -------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------

    /// Amount held by a country.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownCountry`] if the country has no entry.
    pub fn get_amount(&self, code: &CountryCode) -> Result<u64, LedgerError> {
        self.amounts
            .get(code)
            .copied()
            .ok_or_else(|| LedgerError::UnknownCountry {
                kind: self.kind,
                code: code.clone(),
            })
    }

    /// Amount as an integer percentage of the country's population.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownCountry`] if the country has no entry,
    /// or [`LedgerError::World`] if the population model does not know it.
    pub fn get_percentage_of_population(
        &self,
        code: &CountryCode,
        population: &PopulationModel,
    ) -> Result<u32, LedgerError> {
        let amount = self.get_amount(code)?;
        Ok(population.get_percentage(code, amount)?)
    }

    /// Read-only copy of every amount, used as the pre-tick state of a
    /// two-phase update.
    pub fn snapshot(&self) -> BTreeMap<CountryCode, u64> {
        self.amounts.clone()
    }

    /// Sum over all countries.
    pub fn total(&self) -> u64 {
        self.amounts.values().fold(0_u64, |acc, v| acc.saturating_add(*v))
    }

    // -------------------------------------------------------------------
    // Writes
    // -------------------------------------------------------------------

    /// Add a non-negative amount to a country.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownCountry`] if the country has no entry.
    pub fn seed(&mut self, code: &CountryCode, amount: u64) -> Result<(), LedgerError> {
        let kind = self.kind;
        let slot = self.slot(code)?;
        *slot = slot.saturating_add(amount);
        debug!(%kind, country = %code, amount, total = *slot, "ledger seeded");
        Ok(())
    }

    /// Seed a single unit.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownCountry`] if the country has no entry.
    pub fn seed_one(&mut self, code: &CountryCode) -> Result<(), LedgerError> {
        self.seed(code, 1)
    }

    /// Overwrite a country's amount with a computed tick result.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownCountry`] if the country has no entry.
    pub fn set(&mut self, code: &CountryCode, amount: u64) -> Result<(), LedgerError> {
        *self.slot(code)? = amount;
        Ok(())
    }

    /// Add a signed amount, clamping the result at zero.
    ///
    /// Returns the delta actually applied, which differs from `amount` only
    /// when a removal exceeds the stored value.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownCountry`] if the country has no entry.
    pub fn delta(&mut self, code: &CountryCode, amount: i64) -> Result<i64, LedgerError> {
        let kind = self.kind;
        let slot = self.slot(code)?;
        let applied = apply_signed(slot, amount);
        if applied != amount {
            debug!(%kind, country = %code, requested = amount, applied, "ledger clamped at zero");
        }
        Ok(applied)
    }

    /// Transfer entry point for cross-border spread and journeys.
    ///
    /// Same clamping as [`ResourceLedger::delta`], traced per entry.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownCountry`] if the country has no entry.
    pub fn migrate(&mut self, code: &CountryCode, amount: i64) -> Result<i64, LedgerError> {
        let applied = self.delta(code, amount)?;
        trace!(kind = %self.kind, country = %code, applied, "ledger migration");
        Ok(applied)
    }
}

/// Apply a signed delta to an unsigned slot, clamping at zero and
/// saturating at `u64::MAX`. Returns the delta applied.
fn apply_signed(slot: &mut u64, amount: i64) -> i64 {
    let before = *slot;
    let magnitude = amount.unsigned_abs();
    *slot = if amount >= 0 {
        before.saturating_add(magnitude)
    } else {
        before.saturating_sub(magnitude)
    };
    if *slot >= before {
        to_i64(slot.saturating_sub(before))
    } else {
        0_i64.saturating_sub(to_i64(before.saturating_sub(*slot)))
    }
}
