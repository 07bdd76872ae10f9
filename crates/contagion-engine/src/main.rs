//! Engine binary for the Contagion simulation.
//!
//! Wires configuration, structured logging, the data provider and the tick
//! loop together and runs the simulation until a termination condition is
//! met.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `contagion-config.yaml` (or the path in
//!    `CONTAGION_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Load the dataset, or the bundled starting world
//! 4. Build the initial simulation state
//! 5. Create operator state and install the signal handlers (Ctrl-C stops,
//!    `SIGUSR1` toggles pause on Unix)
//! 6. Run the simulation loop
//! 7. Log the result and a final snapshot

mod error;
mod snapshot_callback;

use std::path::PathBuf;
use std::sync::Arc;

use contagion_core::config::{LogFormat, LoggingConfig, SimulationConfig};
use contagion_core::operator::OperatorState;
use contagion_core::provider::{self, StaticProvider};
use contagion_core::runner;
use contagion_core::state::SimulationState;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::snapshot_callback::SnapshotCallback;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "contagion-config.yaml";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if any initialization step or the simulation itself fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging.
    init_logging(&config.logging)?;
    info!(
        world_name = config.world.name,
        seed = config.world.seed,
        tick_interval_ms = config.world.tick_interval_ms,
        start_date = %config.world.start_date,
        "contagion-engine starting"
    );

    // 3. Load world data.
    let provider = load_provider(&config)?;

    // 4. Build the initial state.
    let mut state = SimulationState::initialize(&config, &provider).map_err(EngineError::from)?;

    // 5. Operator controls.
    let operator = Arc::new(OperatorState::new(
        config.world.tick_interval_ms,
        &config.simulation,
    ));
    spawn_shutdown_listener(Arc::clone(&operator));
    spawn_pause_listener(Arc::clone(&operator));

    // 6. Run the simulation.
    let mut callback = SnapshotCallback::new(config.logging.snapshot_interval_ticks);
    callback.publish(&state);
    let result = runner::run_simulation(&mut state, &operator, &mut callback)
        .await
        .map_err(EngineError::from)?;

    // 7. Log results.
    runner::log_simulation_end(&result, &state);
    callback.publish(&state);
    let final_countries = callback.latest().map_or(0, |s| s.countries.len());

    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        countries = final_countries,
        elapsed_seconds = operator.elapsed_seconds(),
        "contagion-engine shutdown complete"
    );

    Ok(())
}

/// Load the simulation configuration.
///
/// Uses `CONTAGION_CONFIG` if set, otherwise `contagion-config.yaml` in the
/// working directory. A missing file yields the defaults.
fn load_config() -> Result<SimulationConfig, EngineError> {
    let path = std::env::var_os("CONTAGION_CONFIG")
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    if path.exists() {
        Ok(SimulationConfig::from_file(&path)?)
    } else {
        let mut config = SimulationConfig::default();
        config.apply_env_overrides();
        Ok(config)
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(config: &LoggingConfig) -> Result<(), EngineError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    let installed = match config.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| EngineError::Logging {
        message: e.to_string(),
    })
}

/// Load the configured dataset, or the bundled starting world when no
/// dataset path is set.
fn load_provider(config: &SimulationConfig) -> Result<StaticProvider, EngineError> {
    let provider = match &config.data.dataset_path {
        Some(path) => {
            info!(path = %path.display(), "Loading dataset");
            StaticProvider::from_json_file(path)?
        }
        None => {
            info!("No dataset configured, using the bundled starting world");
            provider::starting_world()?
        }
    };
    Ok(provider)
}

/// Request a clean stop when the process receives Ctrl-C.
fn spawn_shutdown_listener(operator: Arc<OperatorState>) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl-C received, stopping after the current tick");
                operator.request_stop();
            }
            Err(e) => warn!(error = %e, "failed to listen for Ctrl-C"),
        }
    });
}

/// Toggle pause each time the process receives `SIGUSR1`.
#[cfg(unix)]
fn spawn_pause_listener(operator: Arc<OperatorState>) {
    use tokio::signal::unix::{SignalKind, signal};

    tokio::spawn(async move {
        let mut usr1 = match signal(SignalKind::user_defined1()) {
            Ok(stream) => stream,
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGUSR1");
                return;
            }
        };
        while usr1.recv().await.is_some() {
            if operator.toggle_pause() {
                info!("SIGUSR1 received, pausing");
            } else {
                info!("SIGUSR1 received, resuming");
            }
        }
    });
}

#[cfg(not(unix))]
fn spawn_pause_listener(_operator: Arc<OperatorState>) {}
