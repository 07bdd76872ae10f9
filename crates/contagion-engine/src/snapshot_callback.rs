//! Tick callback that publishes world snapshots.
//!
//! Every `interval` ticks the callback builds a [`WorldSnapshot`], keeps it
//! as the latest frame and logs per-resource totals. The full snapshot is
//! emitted as JSON at `trace` level for consumers tailing the log.

use contagion_core::runner::TickCallback;
use contagion_core::snapshot::build_snapshot;
use contagion_core::state::SimulationState;
use contagion_core::tick::TickSummary;
use contagion_types::{ResourceKind, WorldSnapshot};
use tracing::{debug, info, trace, warn};

/// Callback that turns ticks into render-sink snapshots.
pub struct SnapshotCallback {
    interval: u64,
    latest: Option<WorldSnapshot>,
}

impl SnapshotCallback {
    /// Publish a snapshot every `interval` ticks (0 = never).
    pub const fn new(interval: u64) -> Self {
        Self {
            interval,
            latest: None,
        }
    }

    /// The most recently published snapshot.
    pub const fn latest(&self) -> Option<&WorldSnapshot> {
        self.latest.as_ref()
    }

    /// Build and log a snapshot of `state` now.
    pub fn publish(&mut self, state: &SimulationState) {
        let snapshot = match build_snapshot(state) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, tick = state.tick(), "failed to build snapshot");
                return;
            }
        };

        info!(
            tick = snapshot.tick,
            date = %snapshot.date,
            population = state.population.total(),
            bacon = state.ledger(ResourceKind::Bacon).total(),
            sniffles = state.ledger(ResourceKind::Sniffles).total(),
            smiles = state.ledger(ResourceKind::Smiles).total(),
            apples = state.ledger(ResourceKind::Apples).total(),
            vehicles = snapshot.vehicles.len(),
            "World snapshot"
        );
        match serde_json::to_string(&snapshot) {
            Ok(json) => trace!(snapshot = %json, "snapshot json"),
            Err(e) => warn!(error = %e, "failed to serialize snapshot"),
        }
        self.latest = Some(snapshot);
    }
}

impl TickCallback for SnapshotCallback {
    fn on_tick(&mut self, summary: &TickSummary, state: &SimulationState) {
        let activity = summary
            .journeys
            .as_ref()
            .filter(|j| !j.boarded.is_empty() || !j.arrived.is_empty());
        if let Some(journeys) = activity {
            debug!(
                tick = summary.tick,
                boarded = journeys.boarded.len(),
                arrived = journeys.arrived.len(),
                departed = journeys.passengers_departed,
                landed = journeys.passengers_arrived,
                "journey activity"
            );
        }

        if self.interval > 0 && summary.tick.checked_rem(self.interval) == Some(0) {
            self.publish(state);
        }
    }
}
