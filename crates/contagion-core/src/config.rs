//! Configuration loading and typed config structures for the Contagion
//! simulation.
//!
//! The canonical configuration lives in `contagion-config.yaml` at the
//! project root. Every section and field has a default, so an empty file
//! (or no file at all) runs the reference world.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use contagion_models::ModelsConfig;
use contagion_types::{CountryCode, ResourceKind};
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `contagion-config.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// World-level settings (name, seed, timing, calendar).
    #[serde(default)]
    pub world: WorldConfig,

    /// Per-system periods in base ticks.
    #[serde(default)]
    pub cadence: CadenceConfig,

    /// Dataset location and the years read from it.
    #[serde(default)]
    pub data: DataConfig,

    /// Resource model parameters.
    #[serde(default)]
    pub models: ModelsConfig,

    /// Journey fleet parameters.
    #[serde(default)]
    pub journeys: JourneysConfig,

    /// Initial resource placements.
    #[serde(default = "default_seeds")]
    pub seeds: Vec<SeedConfig>,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Simulation boundary parameters.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `CONTAGION_DATASET` overrides `data.dataset_path`
    /// - `CONTAGION_SEED` overrides `world.seed` (ignored if not a number)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string. No environment overrides
    /// are applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Override values with environment variables when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("CONTAGION_DATASET") {
            self.data.dataset_path = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("CONTAGION_SEED") {
            if let Ok(seed) = val.trim().parse::<u64>() {
                self.world.seed = seed;
            }
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            cadence: CadenceConfig::default(),
            data: DataConfig::default(),
            models: ModelsConfig::default(),
            journeys: JourneysConfig::default(),
            seeds: default_seeds(),
            logging: LoggingConfig::default(),
            simulation: SimulationBoundsConfig::default(),
        }
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable simulation name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for airport and route selection.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Real-time milliseconds per base tick.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Date the population baselines refer to.
    #[serde(default = "default_epoch")]
    pub epoch: NaiveDate,

    /// Simulated date at tick 0.
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            tick_interval_ms: default_tick_interval_ms(),
            epoch: default_epoch(),
            start_date: default_start_date(),
        }
    }
}

/// Per-system periods, in base ticks.
///
/// With the default 10 ms base tick these reproduce the reference timers:
/// journeys every 30 ms, resources every 100 ms, one simulated day per
/// minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CadenceConfig {
    /// Base ticks per simulated day; population advances on day boundaries.
    #[serde(default = "default_population_every")]
    pub population_every: u64,

    /// Base ticks between resource model updates.
    #[serde(default = "default_resources_every")]
    pub resources_every: u64,

    /// Base ticks between journey updates.
    #[serde(default = "default_journeys_every")]
    pub journeys_every: u64,
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            population_every: default_population_every(),
            resources_every: default_resources_every(),
            journeys_every: default_journeys_every(),
        }
    }
}

/// Dataset configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DataConfig {
    /// JSON dataset file. The built-in starting world is used when unset.
    #[serde(default)]
    pub dataset_path: Option<PathBuf>,

    /// Year of the population totals and growth figures.
    #[serde(default = "default_population_year")]
    pub population_year: i32,

    /// Year of the apple production figures.
    #[serde(default = "default_apples_year")]
    pub apples_year: i32,

    /// Year of the preventable-death figures.
    #[serde(default = "default_deaths_year")]
    pub deaths_year: i32,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dataset_path: None,
            population_year: default_population_year(),
            apples_year: default_apples_year(),
            deaths_year: default_deaths_year(),
        }
    }
}

/// Journey fleet configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JourneysConfig {
    /// Whether journeys run at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Kilometres flown per journey update.
    #[serde(default = "default_speed_km")]
    pub speed_km: f64,

    /// Seats per vehicle.
    #[serde(default = "default_capacity")]
    pub capacity: u64,

    /// Journeys kept in flight at once.
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,

    /// Large airports drawn per inhabited continent.
    #[serde(default = "default_airports_per_continent")]
    pub large_per_continent: usize,

    /// Medium airports drawn per inhabited continent.
    #[serde(default = "default_airports_per_continent")]
    pub medium_per_continent: usize,
}

impl Default for JourneysConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            speed_km: default_speed_km(),
            capacity: default_capacity(),
            max_in_flight: default_max_in_flight(),
            large_per_continent: default_airports_per_continent(),
            medium_per_continent: default_airports_per_continent(),
        }
    }
}

/// One initial resource placement.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeedConfig {
    /// Resource to place.
    pub resource: ResourceKind,
    /// Country to place it in.
    pub country: CountryCode,
    /// Units added.
    #[serde(default = "default_seed_amount")]
    pub amount: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), used when `RUST_LOG`
    /// is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Log a world snapshot every N ticks (0 = never).
    #[serde(default = "default_snapshot_interval_ticks")]
    pub snapshot_interval_ticks: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            snapshot_interval_ticks: default_snapshot_interval_ticks(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Simulation boundary configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Maximum number of ticks before the simulation ends (0 = unlimited).
    #[serde(default)]
    pub max_ticks: u64,
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    "Contagion".to_owned()
}

const fn default_seed() -> u64 {
    42
}

const fn default_tick_interval_ms() -> u64 {
    10
}

fn default_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or_default()
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}

const fn default_population_every() -> u64 {
    6000
}

const fn default_resources_every() -> u64 {
    10
}

const fn default_journeys_every() -> u64 {
    3
}

const fn default_population_year() -> i32 {
    2022
}

const fn default_apples_year() -> i32 {
    2020
}

const fn default_deaths_year() -> i32 {
    2019
}

const fn default_true() -> bool {
    true
}

const fn default_speed_km() -> f64 {
    100.0
}

const fn default_capacity() -> u64 {
    100
}

const fn default_max_in_flight() -> usize {
    1
}

const fn default_airports_per_continent() -> usize {
    10
}

const fn default_seed_amount() -> u64 {
    1
}

fn default_seeds() -> Vec<SeedConfig> {
    let mut seeds = Vec::new();
    for (resource, raw) in [(ResourceKind::Bacon, "ZA"), (ResourceKind::Sniffles, "CD")] {
        if let Ok(country) = CountryCode::new(raw) {
            seeds.push(SeedConfig {
                resource,
                country,
                amount: default_seed_amount(),
            });
        }
    }
    seeds
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_snapshot_interval_ticks() -> u64 {
    1000
}

#[cfg(test)]
mod tests {
    use contagion_models::BaconSpreadMode;

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimulationConfig::default();
        assert_eq!(config.world.seed, 42);
        assert_eq!(config.world.tick_interval_ms, 10);
        assert_eq!(config.cadence.journeys_every, 3);
        assert_eq!(config.cadence.resources_every, 10);
        assert_eq!(config.cadence.population_every, 6000);
        assert_eq!(config.journeys.capacity, 100);
        assert_eq!(config.journeys.max_in_flight, 1);
        assert_eq!(config.seeds.len(), 2);
        assert_eq!(config.data.dataset_path, None);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
world:
  name: "Test World"
  seed: 123
  tick_interval_ms: 0
  epoch: "2022-01-01"
  start_date: "2030-06-15"

cadence:
  population_every: 100
  resources_every: 2
  journeys_every: 1

data:
  dataset_path: "data/world.json"
  population_year: 2021

models:
  bacon:
    mode: neighbor_adoption
  sniffles:
    mitigate_with_apples: false

journeys:
  speed_km: 250.0
  capacity: 300
  max_in_flight: 4
  large_per_continent: 2
  medium_per_continent: 0

seeds:
  - resource: bacon
    country: "za"
    amount: 100
  - resource: sniffles
    country: "NO"

logging:
  level: "debug"
  format: json
  snapshot_interval_ticks: 50

simulation:
  max_ticks: 500
"#;

        let config = SimulationConfig::parse(yaml);
        assert!(config.is_ok(), "{config:?}");
        let config = config.ok().unwrap_or_else(SimulationConfig::default);

        assert_eq!(config.world.name, "Test World");
        assert_eq!(config.world.seed, 123);
        assert_eq!(
            config.world.start_date,
            NaiveDate::from_ymd_opt(2030, 6, 15).unwrap_or_default()
        );
        assert_eq!(config.cadence.population_every, 100);
        assert_eq!(
            config.data.dataset_path,
            Some(PathBuf::from("data/world.json"))
        );
        assert_eq!(config.data.population_year, 2021);
        assert_eq!(config.data.apples_year, 2020);
        assert_eq!(config.models.bacon.mode, BaconSpreadMode::NeighborAdoption);
        assert!(!config.models.sniffles.mitigate_with_apples);
        assert_eq!(config.journeys.max_in_flight, 4);
        assert_eq!(config.seeds.len(), 2);
        assert_eq!(config.seeds.first().map(|s| s.amount), Some(100));
        assert_eq!(
            config.seeds.first().map(|s| s.country.as_str().to_owned()),
            Some("ZA".to_owned())
        );
        assert_eq!(config.seeds.get(1).map(|s| s.amount), Some(1));
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.simulation.max_ticks, 500);
    }

    #[test]
    fn parse_minimal_yaml() {
        let yaml = "world:\n  seed: 7\n";
        let config = SimulationConfig::parse(yaml);
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_else(SimulationConfig::default);

        // Seed is overridden
        assert_eq!(config.world.seed, 7);
        // Everything else uses defaults
        assert_eq!(config.cadence.resources_every, 10);
        assert_eq!(config.journeys.speed_km.to_bits(), 100.0_f64.to_bits());
        assert_eq!(config.seeds.len(), 2);
    }

    #[test]
    fn parse_empty_yaml() {
        let config = SimulationConfig::parse("");
        assert!(config.is_ok());
        assert_eq!(config.ok().map(|c| c.seeds.len()), Some(2));
    }

    #[test]
    fn invalid_seed_country_is_rejected() {
        let yaml = "seeds:\n  - resource: bacon\n    country: ZAF\n";
        assert!(matches!(
            SimulationConfig::parse(yaml),
            Err(ConfigError::Yaml { .. })
        ));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("contagion-config.yaml");
        if path.exists() {
            let config = SimulationConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
