//! Simulation loop runner with operator controls.
//!
//! This module provides [`run_simulation`], the top-level async function
//! that drives the tick loop with support for:
//!
//! - **Bounded simulation**: stop after `max_ticks`
//! - **Pause/resume**: operator can halt and continue the tick loop
//! - **Variable tick speed**: tick interval adjustable at runtime
//! - **Operator stop**: clean stop between ticks, never mid-tick
//!
//! The runner wraps the single-tick [`run_tick`] function and adds the
//! control plane around it.
//!
//! [`run_tick`]: crate::tick::run_tick

use std::sync::Arc;

use contagion_types::ResourceKind;
use tracing::{info, warn};

use crate::operator::{OperatorState, SimulationEndReason};
use crate::state::SimulationState;
use crate::tick::{self, TickError, TickSummary};

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },
}

/// Result of the simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Total number of ticks executed.
    pub total_ticks: u64,
}

/// Callback invoked after each tick completes.
///
/// The engine uses this to publish snapshots and log progress. The
/// callback receives the tick summary and the state after the tick.
pub trait TickCallback: Send {
    /// Called after a tick completes successfully.
    fn on_tick(&mut self, summary: &TickSummary, state: &SimulationState);
}

/// A tick callback that does nothing.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _state: &SimulationState) {}
}

/// Run the simulation loop until a termination condition is met.
///
/// Stop requests and pauses are honoured between ticks only; a tick that
/// has started always completes. Nothing is rolled back on stop.
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick execution fails.
pub async fn run_simulation(
    state: &mut SimulationState,
    operator: &Arc<OperatorState>,
    callback: &mut dyn TickCallback,
) -> Result<SimulationResult, RunnerError> {
    let mut last_summary: Option<TickSummary> = None;
    let mut total_ticks: u64 = 0;

    info!(
        max_ticks = operator.max_ticks(),
        tick_interval_ms = operator.tick_interval_ms(),
        start_tick = state.tick(),
        "Simulation starting"
    );

    loop {
        // --- Check pause ---
        if operator.is_paused() {
            info!("Simulation paused, waiting for resume...");
            operator.wait_if_paused().await;
            info!("Simulation resumed");
        }

        // --- Check stop request (before tick) ---
        if operator.is_stop_requested() {
            info!("Operator stop requested");
            let reason = SimulationEndReason::OperatorStop;
            operator.set_end_reason(reason).await;
            return Ok(SimulationResult {
                end_reason: reason,
                final_summary: last_summary,
                total_ticks,
            });
        }

        // --- Execute tick ---
        let summary = tick::run_tick(state)?;

        total_ticks = total_ticks.saturating_add(1);

        // --- Notify callback ---
        callback.on_tick(&summary, state);

        // --- Check tick limit (after tick) ---
        if operator.tick_limit_reached(summary.tick) {
            info!(
                tick = summary.tick,
                max_ticks = operator.max_ticks(),
                "Tick limit reached"
            );
            let reason = SimulationEndReason::MaxTicksReached;
            operator.set_end_reason(reason).await;
            return Ok(SimulationResult {
                end_reason: reason,
                final_summary: Some(summary),
                total_ticks,
            });
        }

        last_summary = Some(summary);

        // --- Sleep for tick interval ---
        let interval_ms = operator.tick_interval_ms();
        if interval_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(interval_ms)).await;
        } else {
            // Let the Ctrl-C handler run between back-to-back ticks.
            tokio::task::yield_now().await;
        }
    }
}

/// Log the simulation end sequence.
pub fn log_simulation_end(result: &SimulationResult, state: &SimulationState) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        "Simulation ended"
    );

    if let Some(ref summary) = result.final_summary {
        info!(
            tick = summary.tick,
            date = %summary.date,
            population = state.population.total(),
            bacon = state.ledger(ResourceKind::Bacon).total(),
            sniffles = state.ledger(ResourceKind::Sniffles).total(),
            smiles = state.ledger(ResourceKind::Smiles).total(),
            apples = state.ledger(ResourceKind::Apples).total(),
            journeys_in_flight = state.journeys.len(),
            "Final world state"
        );
    } else {
        warn!("Simulation ended with no ticks executed");
    }
}
