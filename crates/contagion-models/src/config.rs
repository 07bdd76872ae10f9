//! Tunable parameters for the resource models.
//!
//! These values correspond to the `models` section of
//! `contagion-config.yaml`. Every field has a default, so a partial (or
//! missing) section yields the reference behaviour.

use serde::{Deserialize, Serialize};

/// Parameters for every resource model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Bacon spread.
    pub bacon: BaconConfig,
    /// Sniffles spread and mitigation.
    pub sniffles: SnifflesConfig,
    /// Smiles growth.
    pub smiles: SmilesConfig,
    /// Apple production.
    pub apples: ApplesConfig,
    /// Prophylaxis derivation.
    pub prophylaxis: ProphylaxisConfig,
}

// ---------------------------------------------------------------------------
// Shared spread parameters
// ---------------------------------------------------------------------------

/// Internal growth and cross-border export parameters of a spreading
/// resource.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpreadParams {
    /// Fractional growth per tick within a country.
    pub internal_rate: f64,
    /// Fraction of a country's amount exported to each neighbour per tick.
    pub external_rate: f64,
    /// A country exports only when its population percentage is strictly
    /// above this value.
    pub external_threshold_pct: u32,
}

impl Default for SpreadParams {
    fn default() -> Self {
        Self {
            internal_rate: DEFAULT_INTERNAL_RATE,
            external_rate: DEFAULT_EXTERNAL_RATE,
            external_threshold_pct: DEFAULT_EXTERNAL_THRESHOLD_PCT,
        }
    }
}

/// Default internal growth per tick.
pub const DEFAULT_INTERNAL_RATE: f64 = 0.01;
/// Default cross-border export fraction per tick.
pub const DEFAULT_EXTERNAL_RATE: f64 = 0.001;
/// Default export threshold, in percent of population.
pub const DEFAULT_EXTERNAL_THRESHOLD_PCT: u32 = 20;

const fn default_internal_rate() -> f64 {
    DEFAULT_INTERNAL_RATE
}

const fn default_external_rate() -> f64 {
    DEFAULT_EXTERNAL_RATE
}

const fn default_external_threshold_pct() -> u32 {
    DEFAULT_EXTERNAL_THRESHOLD_PCT
}

// ---------------------------------------------------------------------------
// Bacon
// ---------------------------------------------------------------------------

/// How bacon crosses borders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaconSpreadMode {
    /// Internal growth plus threshold-gated export, like sniffles.
    #[default]
    Threshold,
    /// Every neighbour of a country holding bacon gains a flat increment.
    /// No internal growth.
    NeighborAdoption,
}

/// Bacon parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaconConfig {
    /// Spread rule.
    #[serde(default)]
    pub mode: BaconSpreadMode,
    /// Fractional growth per tick within a country.
    #[serde(default = "default_internal_rate")]
    pub internal_rate: f64,
    /// Export fraction per neighbour per tick.
    #[serde(default = "default_external_rate")]
    pub external_rate: f64,
    /// Export threshold in percent of population.
    #[serde(default = "default_external_threshold_pct")]
    pub external_threshold_pct: u32,
    /// Units gained per tick in [`BaconSpreadMode::NeighborAdoption`].
    #[serde(default = "default_adoption_increment")]
    pub adoption_increment: u64,
}

impl BaconConfig {
    /// Spread parameters used in threshold mode.
    pub const fn spread(&self) -> SpreadParams {
        SpreadParams {
            internal_rate: self.internal_rate,
            external_rate: self.external_rate,
            external_threshold_pct: self.external_threshold_pct,
        }
    }
}

impl Default for BaconConfig {
    fn default() -> Self {
        Self {
            mode: BaconSpreadMode::default(),
            internal_rate: DEFAULT_INTERNAL_RATE,
            external_rate: DEFAULT_EXTERNAL_RATE,
            external_threshold_pct: DEFAULT_EXTERNAL_THRESHOLD_PCT,
            adoption_increment: default_adoption_increment(),
        }
    }
}

const fn default_adoption_increment() -> u64 {
    1000
}

// ---------------------------------------------------------------------------
// Sniffles
// ---------------------------------------------------------------------------

/// Sniffles parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnifflesConfig {
    /// Base growth per tick, divided by the country's prophylaxis factor.
    #[serde(default = "default_internal_rate")]
    pub internal_rate: f64,
    /// Export fraction per neighbour per tick.
    #[serde(default = "default_external_rate")]
    pub external_rate: f64,
    /// Export threshold in percent of population.
    #[serde(default = "default_external_threshold_pct")]
    pub external_threshold_pct: u32,
    /// Whether apples cure sniffles during internal spread.
    #[serde(default = "default_true")]
    pub mitigate_with_apples: bool,
}

impl SnifflesConfig {
    /// Spread parameters before the prophylaxis adjustment.
    pub const fn spread(&self) -> SpreadParams {
        SpreadParams {
            internal_rate: self.internal_rate,
            external_rate: self.external_rate,
            external_threshold_pct: self.external_threshold_pct,
        }
    }
}

impl Default for SnifflesConfig {
    fn default() -> Self {
        Self {
            internal_rate: DEFAULT_INTERNAL_RATE,
            external_rate: DEFAULT_EXTERNAL_RATE,
            external_threshold_pct: DEFAULT_EXTERNAL_THRESHOLD_PCT,
            mitigate_with_apples: true,
        }
    }
}

const fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Smiles
// ---------------------------------------------------------------------------

/// Smiles parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmilesConfig {
    /// Fractional growth per tick before the bacon/sniffles adjustment.
    #[serde(default = "default_internal_rate")]
    pub internal_rate: f64,
    /// Smiles placed in every country at initialization.
    #[serde(default = "default_initial_smiles")]
    pub initial_per_country: u64,
}

impl Default for SmilesConfig {
    fn default() -> Self {
        Self {
            internal_rate: DEFAULT_INTERNAL_RATE,
            initial_per_country: default_initial_smiles(),
        }
    }
}

const fn default_initial_smiles() -> u64 {
    1
}

// ---------------------------------------------------------------------------
// Apples
// ---------------------------------------------------------------------------

/// Apple production parameters.
///
/// Per tick, a country with `t` tonnes of annual production gains
/// `ceil(t * apples_per_tonne / days_per_year * days_per_tick)` apples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplesConfig {
    /// Apples per tonne of harvest.
    #[serde(default = "default_apples_per_tonne")]
    pub apples_per_tonne: f64,
    /// Days the annual harvest is spread over.
    #[serde(default = "default_days_per_year")]
    pub days_per_year: f64,
    /// Simulated days per resource tick.
    #[serde(default = "default_days_per_tick")]
    pub days_per_tick: f64,
}

impl ApplesConfig {
    /// Apples produced per tick for `tonnes` of annual production.
    pub fn per_tick_factor(&self) -> f64 {
        if self.days_per_year <= 0.0 {
            return 0.0;
        }
        self.apples_per_tonne / self.days_per_year * self.days_per_tick
    }
}

impl Default for ApplesConfig {
    fn default() -> Self {
        Self {
            apples_per_tonne: default_apples_per_tonne(),
            days_per_year: default_days_per_year(),
            days_per_tick: default_days_per_tick(),
        }
    }
}

const fn default_apples_per_tonne() -> f64 {
    7000.0
}

const fn default_days_per_year() -> f64 {
    365.0
}

const fn default_days_per_tick() -> f64 {
    0.000_001
}

// ---------------------------------------------------------------------------
// Prophylaxis
// ---------------------------------------------------------------------------

/// Prophylaxis derivation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProphylaxisConfig {
    /// Death rate that maps to a factor of exactly 1.
    #[serde(default = "default_median_rate")]
    pub median_rate: f64,
    /// Lower bound on every factor.
    #[serde(default = "default_min_factor")]
    pub min_factor: f64,
}

impl Default for ProphylaxisConfig {
    fn default() -> Self {
        Self {
            median_rate: default_median_rate(),
            min_factor: default_min_factor(),
        }
    }
}

const fn default_median_rate() -> f64 {
    10.0
}

const fn default_min_factor() -> f64 {
    0.1
}
