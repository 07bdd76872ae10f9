//! Data provider contract and the built-in starting world.
//!
//! The engine never parses CSVs itself. Everything it needs before the
//! first tick (country set, yearly indicator values, borders, airports)
//! comes through a [`DataProvider`]. Providers return raw values:
//! missing countries are simply absent from the returned maps, and the
//! initialization phase decides how to fill the gaps with [`fill_missing`].
//!
//! [`StaticProvider`] is an in-memory provider that can be built in code or
//! loaded from a JSON dataset file. [`starting_world`] returns the small
//! demo world embedded in the crate.

use std::collections::BTreeMap;
use std::path::Path;

use contagion_types::{Airport, CountryCode, InvalidCountryCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Errors that can occur while loading provider data.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Failed to read a dataset file.
    #[error("failed to read dataset: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Dataset content is not valid JSON or does not match the schema.
    #[error("failed to parse dataset JSON: {source}")]
    Json {
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// A country code in the dataset is not two ASCII letters.
    #[error(transparent)]
    InvalidCountryCode(#[from] InvalidCountryCode),
}

impl From<serde_json::Error> for ProviderError {
    fn from(source: serde_json::Error) -> Self {
        Self::Json { source }
    }
}

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

/// Yearly per-country indicators a provider can serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetId {
    /// Total population.
    PopulationTotal,
    /// Annual population growth.
    PopulationGrowth,
    /// Annual apple production in tonnes.
    AppleProduction,
    /// Share of deaths from preventable (communicable) causes, in percent.
    PreventableDeaths,
}

impl DatasetId {
    /// Key of the dataset in a JSON dataset file.
    pub const fn key(self) -> &'static str {
        match self {
            Self::PopulationTotal => "population_total",
            Self::PopulationGrowth => "population_growth",
            Self::AppleProduction => "apple_production",
            Self::PreventableDeaths => "preventable_deaths",
        }
    }
}

/// Source of the static data the simulation starts from.
pub trait DataProvider {
    /// The canonical country set.
    fn country_codes(&self) -> Result<Vec<CountryCode>, ProviderError>;

    /// Values of `dataset` in `year` for the requested countries. Countries
    /// without a value are absent from the result.
    fn load_yearly_value(
        &self,
        dataset: DatasetId,
        countries: &[CountryCode],
        year: i32,
    ) -> Result<BTreeMap<CountryCode, f64>, ProviderError>;

    /// Neighbour lists. Countries without borders may be absent.
    fn load_borders(&self) -> Result<BTreeMap<CountryCode, Vec<CountryCode>>, ProviderError>;

    /// Airport reference data, unfiltered.
    fn load_airports(&self) -> Result<Vec<Airport>, ProviderError>;
}

// ---------------------------------------------------------------------------
// Missing values
// ---------------------------------------------------------------------------

/// How [`fill_missing`] replaces absent or non-finite values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Use 0.
    Zero,
    /// Use the largest finite value present. When no value is finite the
    /// gaps are left for the consumer to handle.
    MaxFinite,
}

/// Complete `values` for `countries` according to `fallback`.
///
/// Non-finite values are always treated as missing. Values for countries
/// outside `countries` are dropped.
pub fn fill_missing(
    values: &BTreeMap<CountryCode, f64>,
    countries: &[CountryCode],
    fallback: Fallback,
) -> BTreeMap<CountryCode, f64> {
    let finite = |code: &CountryCode| values.get(code).copied().filter(|v| v.is_finite());
    let replacement = match fallback {
        Fallback::Zero => Some(0.0),
        Fallback::MaxFinite => countries.iter().filter_map(finite).reduce(f64::max),
    };

    let mut filled = BTreeMap::new();
    let mut missing = 0_usize;
    for code in countries {
        match finite(code).or(replacement) {
            Some(value) => {
                if finite(code).is_none() {
                    missing = missing.saturating_add(1);
                }
                filled.insert(code.clone(), value);
            }
            None => missing = missing.saturating_add(1),
        }
    }
    if missing > 0 {
        warn!(missing, ?fallback, ?replacement, "provider values filled by fallback");
    }
    filled
}

// ---------------------------------------------------------------------------
// Static provider
// ---------------------------------------------------------------------------

/// In-memory data provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticProvider {
    countries: Vec<CountryCode>,
    values: BTreeMap<(DatasetId, i32), BTreeMap<CountryCode, f64>>,
    borders: BTreeMap<CountryCode, Vec<CountryCode>>,
    airports: Vec<Airport>,
}

/// On-disk layout of a JSON dataset file.
///
/// `values` is keyed by [`DatasetId::key`], then by year. `null` cells are
/// treated as missing.
#[derive(Debug, Deserialize)]
struct DatasetFile {
    countries: Vec<String>,
    #[serde(default)]
    values: BTreeMap<String, BTreeMap<String, BTreeMap<String, Option<f64>>>>,
    #[serde(default)]
    borders: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    airports: Vec<Airport>,
}

const DATASETS: [DatasetId; 4] = [
    DatasetId::PopulationTotal,
    DatasetId::PopulationGrowth,
    DatasetId::AppleProduction,
    DatasetId::PreventableDeaths,
];

impl StaticProvider {
    /// A provider with the given countries and no data.
    pub const fn new(countries: Vec<CountryCode>) -> Self {
        Self {
            countries,
            values: BTreeMap::new(),
            borders: BTreeMap::new(),
            airports: Vec::new(),
        }
    }

    /// Set one yearly value.
    #[must_use]
    pub fn with_value(mut self, dataset: DatasetId, year: i32, code: CountryCode, value: f64) -> Self {
        self.values
            .entry((dataset, year))
            .or_default()
            .insert(code, value);
        self
    }

    /// Add a border `from -> to`.
    #[must_use]
    pub fn with_border(mut self, from: CountryCode, to: CountryCode) -> Self {
        self.borders.entry(from).or_default().push(to);
        self
    }

    /// Add an airport.
    #[must_use]
    pub fn with_airport(mut self, airport: Airport) -> Self {
        self.airports.push(airport);
        self
    }

    /// Load a JSON dataset file.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the file cannot be read or parsed.
    pub fn from_json_file(path: &Path) -> Result<Self, ProviderError> {
        let contents = std::fs::read_to_string(path)?;
        let provider = Self::from_json_str(&contents)?;
        debug!(path = %path.display(), "dataset loaded");
        Ok(provider)
    }

    /// Parse a JSON dataset.
    ///
    /// Unknown dataset keys and non-numeric years are skipped with a
    /// warning.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Json`] for malformed JSON and
    /// [`ProviderError::InvalidCountryCode`] for a bad country code.
    pub fn from_json_str(json: &str) -> Result<Self, ProviderError> {
        let file: DatasetFile = serde_json::from_str(json)?;

        let countries = file
            .countries
            .iter()
            .map(|raw| CountryCode::new(raw))
            .collect::<Result<Vec<_>, _>>()?;

        let mut values = BTreeMap::new();
        for (key, years) in &file.values {
            let Some(dataset) = DATASETS.into_iter().find(|d| d.key() == key) else {
                warn!(dataset = %key, "unknown dataset skipped");
                continue;
            };
            for (raw_year, cells) in years {
                let Ok(year) = raw_year.trim().parse::<i32>() else {
                    warn!(dataset = %key, year = %raw_year, "non-numeric year skipped");
                    continue;
                };
                let mut row = BTreeMap::new();
                for (raw_code, cell) in cells {
                    let code = CountryCode::new(raw_code)?;
                    if let Some(value) = cell {
                        row.insert(code, *value);
                    }
                }
                values.insert((dataset, year), row);
            }
        }

        let mut borders = BTreeMap::new();
        for (raw_code, neighbours) in &file.borders {
            let code = CountryCode::new(raw_code)?;
            let neighbours = neighbours
                .iter()
                .map(|raw| CountryCode::new(raw))
                .collect::<Result<Vec<_>, _>>()?;
            borders.insert(code, neighbours);
        }

        Ok(Self {
            countries,
            values,
            borders,
            airports: file.airports,
        })
    }
}

impl DataProvider for StaticProvider {
    fn country_codes(&self) -> Result<Vec<CountryCode>, ProviderError> {
        Ok(self.countries.clone())
    }

    fn load_yearly_value(
        &self,
        dataset: DatasetId,
        countries: &[CountryCode],
        year: i32,
    ) -> Result<BTreeMap<CountryCode, f64>, ProviderError> {
        let Some(row) = self.values.get(&(dataset, year)) else {
            warn!(dataset = dataset.key(), year, "no values for dataset year");
            return Ok(BTreeMap::new());
        };
        Ok(countries
            .iter()
            .filter_map(|code| row.get(code).map(|value| (code.clone(), *value)))
            .collect())
    }

    fn load_borders(&self) -> Result<BTreeMap<CountryCode, Vec<CountryCode>>, ProviderError> {
        Ok(self.borders.clone())
    }

    fn load_airports(&self) -> Result<Vec<Airport>, ProviderError> {
        Ok(self.airports.clone())
    }
}

/// Built-in demo world: southern and central Africa plus a few countries on
/// other continents, with real borders and airports.
///
/// # Errors
///
/// Returns [`ProviderError`] only if the embedded dataset is malformed.
pub fn starting_world() -> Result<StaticProvider, ProviderError> {
    StaticProvider::from_json_str(include_str!("../data/starting-world.json"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn code(raw: &str) -> CountryCode {
        CountryCode::new(raw).unwrap()
    }

    #[test]
    fn starting_world_loads() {
        let world = starting_world().unwrap();
        let codes = world.country_codes().unwrap();
        assert!(codes.contains(&code("ZA")));
        assert!(codes.contains(&code("BW")));
        assert!(codes.contains(&code("CD")));

        let borders = world.load_borders().unwrap();
        assert!(borders.get(&code("ZA")).unwrap().contains(&code("BW")));
        assert!(!borders.contains_key(&code("MG")));
        assert!(!world.load_airports().unwrap().is_empty());
    }

    #[test]
    fn yearly_values_are_filtered_to_requested_countries() {
        let world = starting_world().unwrap();
        let wanted = vec![code("ZA"), code("BW")];
        let totals = world
            .load_yearly_value(DatasetId::PopulationTotal, &wanted, 2022)
            .unwrap();
        assert_eq!(totals.len(), 2);
        assert!(totals.get(&code("ZA")).is_some_and(|v| *v > 59_000_000.0));
    }

    #[test]
    fn missing_year_is_empty() {
        let world = starting_world().unwrap();
        let values = world
            .load_yearly_value(DatasetId::PopulationTotal, &[code("ZA")], 1900)
            .unwrap();
        assert!(values.is_empty());
    }

    #[test]
    fn null_cells_are_missing() {
        let world = starting_world().unwrap();
        let deaths = world
            .load_yearly_value(DatasetId::PreventableDeaths, &[code("LS"), code("ZA")], 2019)
            .unwrap();
        assert!(!deaths.contains_key(&code("LS")));
        assert!(deaths.contains_key(&code("ZA")));
    }

    #[test]
    fn invalid_country_code_rejected() {
        let json = r#"{ "countries": ["ZA", "ZAF"] }"#;
        assert!(matches!(
            StaticProvider::from_json_str(json),
            Err(ProviderError::InvalidCountryCode(_))
        ));
    }

    #[test]
    fn malformed_json_rejected() {
        assert!(matches!(
            StaticProvider::from_json_str("{ countries: "),
            Err(ProviderError::Json { .. })
        ));
    }

    #[test]
    fn fill_missing_with_zero() {
        let mut values = BTreeMap::new();
        values.insert(code("ZA"), 5.0);
        values.insert(code("BW"), f64::NAN);
        let countries = vec![code("ZA"), code("BW"), code("NA")];

        let filled = fill_missing(&values, &countries, Fallback::Zero);
        assert_eq!(filled.len(), 3);
        assert!(filled.get(&code("BW")).is_some_and(|v| v.abs() < f64::EPSILON));
        assert!(filled.get(&code("NA")).is_some_and(|v| v.abs() < f64::EPSILON));
        assert!(filled.get(&code("ZA")).is_some_and(|v| (*v - 5.0).abs() < f64::EPSILON));
    }

    #[test]
    fn fill_missing_with_max_finite() {
        let mut values = BTreeMap::new();
        values.insert(code("ZA"), 5.0);
        values.insert(code("CD"), 57.0);
        values.insert(code("BW"), f64::INFINITY);
        // Not a requested country; must not become the fallback.
        values.insert(code("FR"), 99.0);
        let countries = vec![code("ZA"), code("CD"), code("BW"), code("NA")];

        let filled = fill_missing(&values, &countries, Fallback::MaxFinite);
        assert!(filled.get(&code("BW")).is_some_and(|v| (*v - 57.0).abs() < f64::EPSILON));
        assert!(filled.get(&code("NA")).is_some_and(|v| (*v - 57.0).abs() < f64::EPSILON));
        assert!(!filled.contains_key(&code("FR")));
    }

    #[test]
    fn fill_missing_max_finite_without_data_leaves_gaps() {
        let filled = fill_missing(&BTreeMap::new(), &[code("ZA")], Fallback::MaxFinite);
        assert!(filled.is_empty());
    }

    #[test]
    fn builder_provider() {
        let provider = StaticProvider::new(vec![code("ZA"), code("BW")])
            .with_value(DatasetId::PopulationTotal, 2022, code("ZA"), 100.0)
            .with_border(code("ZA"), code("BW"));
        let totals = provider
            .load_yearly_value(DatasetId::PopulationTotal, &[code("ZA"), code("BW")], 2022)
            .unwrap();
        assert_eq!(totals.len(), 1);
        assert_eq!(
            provider.load_borders().unwrap().get(&code("ZA")),
            Some(&vec![code("BW")])
        );
    }
}
