//! Prophylaxis: a constant per-country divisor on sniffles growth.
//!
//! Derived once at initialization from the share of deaths attributed to
//! preventable causes. A country at the median rate gets factor 1; a
//! country with half the median rate gets factor 2 and sniffles grow half
//! as fast there.
//!
//! ```text
//! factor = max(min_factor, median_rate / death_rate)
//! ```
//!
//! Missing, non-finite or non-positive death rates are replaced by the
//! largest usable rate in the dataset (the least protected country), or by
//! the median when the dataset has no usable value at all.

use std::collections::BTreeMap;

use contagion_types::CountryCode;
use contagion_world::WorldError;
use tracing::{debug, warn};

use crate::config::ProphylaxisConfig;

/// Per-country prophylaxis factors. Constant for the whole run.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Prophylaxis {
    factors: BTreeMap<CountryCode, f64>,
}

impl Prophylaxis {
    /// Derive factors for `codes` from preventable-death rates.
    pub fn from_death_rates<I>(
        codes: I,
        rates: &BTreeMap<CountryCode, f64>,
        config: &ProphylaxisConfig,
    ) -> Self
    where
        I: IntoIterator<Item = CountryCode>,
    {
        let usable = |rate: f64| rate.is_finite() && rate > 0.0;
        let fallback = rates
            .values()
            .copied()
            .filter(|rate| usable(*rate))
            .reduce(f64::max)
            .unwrap_or(config.median_rate);

        let mut replaced = 0_usize;
        let factors = codes
            .into_iter()
            .map(|code| {
                let rate = match rates.get(&code).copied() {
                    Some(rate) if usable(rate) => rate,
                    _ => {
                        replaced = replaced.saturating_add(1);
                        fallback
                    }
                };
                let raw = config.median_rate / rate;
                let factor = if raw.is_finite() {
                    raw.max(config.min_factor)
                } else {
                    1.0
                };
                (code, factor)
            })
            .collect::<BTreeMap<_, _>>();

        if replaced > 0 {
            warn!(replaced, fallback, "prophylaxis used fallback death rate");
        }
        debug!(countries = factors.len(), "prophylaxis factors derived");
        Self { factors }
    }

    /// The same factor in every country.
    pub fn uniform<I>(codes: I, factor: f64) -> Self
    where
        I: IntoIterator<Item = CountryCode>,
    {
        Self {
            factors: codes.into_iter().map(|code| (code, factor)).collect(),
        }
    }

    /// Factor for a country.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownCountry`] if the country has no factor.
    pub fn get_value(&self, code: &CountryCode) -> Result<f64, WorldError> {
        self.factors
            .get(code)
            .copied()
            .ok_or_else(|| WorldError::UnknownCountry(code.clone()))
    }

    /// Iterate over `(country, factor)` pairs in code order.
    pub fn iter(&self) -> impl Iterator<Item = (&CountryCode, f64)> {
        self.factors.iter().map(|(code, factor)| (code, *factor))
    }

    /// Number of countries with a factor.
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    /// Whether no country has a factor.
    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}
