//! Population model: per-country baseline plus linear annual growth.
//!
//! Each country stores a baseline total as of a fixed epoch and a signed
//! annual growth figure. The population on any date is
//!
//! ```text
//! floor(baseline + (growth / 365) * days_since_epoch)
//! ```
//!
//! clamped at zero. The model has no tick of its own: the tick driver moves
//! the calendar with [`PopulationModel::set_date`] once per simulated day.
//! Journeys move people between countries through
//! [`PopulationModel::migrate`], which shifts the baseline.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use contagion_types::CountryCode;
use tracing::trace;

use crate::error::WorldError;
use crate::numeric::{floor_u64, to_f64, to_i64};

/// Days per year used to turn annual growth into daily growth.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Baseline and growth of a single country.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PopulationEntry {
    /// Population at the epoch, including every migration applied since.
    pub baseline: i64,
    /// People gained per year (negative for shrinking countries).
    pub annual_growth: f64,
}

/// Derived population for every country in the canonical set.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PopulationModel {
    /// Date the baselines refer to.
    epoch: NaiveDate,
    /// Current simulation date.
    date: NaiveDate,
    /// Per-country baseline and growth.
    entries: BTreeMap<CountryCode, PopulationEntry>,
}

impl PopulationModel {
    /// Create an empty model whose calendar starts at `date`.
    pub const fn new(epoch: NaiveDate, date: NaiveDate) -> Self {
        Self {
            epoch,
            date,
            entries: BTreeMap::new(),
        }
    }

    /// Register a country.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateCountry`] if the country is already
    /// registered.
    pub fn insert(
        &mut self,
        code: CountryCode,
        total: u64,
        annual_growth: f64,
    ) -> Result<(), WorldError> {
        if self.entries.contains_key(&code) {
            return Err(WorldError::DuplicateCountry(code));
        }
        let growth = if annual_growth.is_finite() {
            annual_growth
        } else {
            0.0
        };
        self.entries.insert(
            code,
            PopulationEntry {
                baseline: to_i64(total),
                annual_growth: growth,
            },
        );
        Ok(())
    }

    /// Epoch the baselines are expressed at.
    pub const fn epoch(&self) -> NaiveDate {
        self.epoch
    }

    /// Current simulation date.
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Move the calendar. Called by the tick driver on day boundaries.
    pub const fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
    }

    /// Whole days between the epoch and the current date (negative before
    /// the epoch).
    pub fn days_since_epoch(&self) -> i64 {
        self.date.signed_duration_since(self.epoch).num_days()
    }

    /// Whether the country is registered.
    pub fn contains(&self, code: &CountryCode) -> bool {
        self.entries.contains_key(code)
    }

    /// Registered country codes, in ascending order.
    pub fn codes(&self) -> impl Iterator<Item = &CountryCode> {
        self.entries.keys()
    }

    /// Raw entry for a country.
    pub fn entry(&self, code: &CountryCode) -> Option<&PopulationEntry> {
        self.entries.get(code)
    }

    /// Population of a country on the current date.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownCountry`] if the country is not
    /// registered.
    pub fn get_population(&self, code: &CountryCode) -> Result<u64, WorldError> {
        let entry = self
            .entries
            .get(code)
            .ok_or_else(|| WorldError::UnknownCountry(code.clone()))?;
        #[allow(clippy::cast_precision_loss)]
        let baseline = entry.baseline as f64;
        #[allow(clippy::cast_precision_loss)]
        let days = self.days_since_epoch() as f64;
        let daily_growth = entry.annual_growth / DAYS_PER_YEAR;
        Ok(floor_u64(daily_growth.mul_add(days, baseline)))
    }

    /// `min(amount, population)`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownCountry`] if the country is not
    /// registered.
    pub fn cap_by_population(&self, code: &CountryCode, amount: u64) -> Result<u64, WorldError> {
        Ok(amount.min(self.get_population(code)?))
    }

    /// `floor(amount / population * 100)`.
    ///
    /// Returns 0 when the population is 0 or the ratio is not finite. Values
    /// above 100 are possible for uncapped resources.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownCountry`] if the country is not
    /// registered.
    pub fn get_percentage(&self, code: &CountryCode, amount: u64) -> Result<u32, WorldError> {
        let population = self.get_population(code)?;
        Ok(percentage(amount, population))
    }

    /// `log10(population)`, or 0 for an empty country.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownCountry`] if the country is not
    /// registered.
    pub fn magnitude(&self, code: &CountryCode) -> Result<f64, WorldError> {
        let population = self.get_population(code)?;
        if population == 0 {
            return Ok(0.0);
        }
        Ok(to_f64(population).log10())
    }

    /// Add a signed number of people to a country.
    ///
    /// A removal larger than the current population is clamped so the
    /// population lands on exactly zero. Returns the delta actually applied.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownCountry`] if the country is not
    /// registered, or [`WorldError::ArithmeticOverflow`] if the baseline
    /// would overflow.
    pub fn migrate(&mut self, code: &CountryCode, delta: i64) -> Result<i64, WorldError> {
        let current = to_i64(self.get_population(code)?);
        let applied = delta.max(0_i64.saturating_sub(current));
        let entry = self
            .entries
            .get_mut(code)
            .ok_or_else(|| WorldError::UnknownCountry(code.clone()))?;
        entry.baseline = entry
            .baseline
            .checked_add(applied)
            .ok_or(WorldError::ArithmeticOverflow)?;
        trace!(country = %code, requested = delta, applied, "population migrated");
        Ok(applied)
    }

    /// Sum of all country populations on the current date.
    pub fn total(&self) -> u64 {
        self.entries
            .keys()
            .filter_map(|code| self.get_population(code).ok())
            .fold(0_u64, u64::saturating_add)
    }
}

/// `floor(amount / population * 100)`, 0 when undefined.
pub fn percentage(amount: u64, population: u64) -> u32 {
    if population == 0 {
        return 0;
    }
    let ratio = to_f64(amount) / to_f64(population) * 100.0;
    if !ratio.is_finite() {
        return 0;
    }
    u32::try_from(floor_u64(ratio)).unwrap_or(u32::MAX)
}
