//! World clock, journeys, tick driver, and orchestration for the Contagion
//! simulation.
//!
//! This crate wires the border graph, population model and resource models
//! into a running simulation driven by a single base tick.
//!
//! # Modules
//!
//! - [`clock`] -- Base tick counter, simulated calendar and per-system
//!   cadence.
//! - [`config`] -- Configuration loading from `contagion-config.yaml` into
//!   strongly-typed structs.
//! - [`journeys`] -- Boarding, flight and arrival of passenger vehicles.
//! - [`operator`] -- Shared pause/stop/speed controls.
//! - [`provider`] -- [`DataProvider`] trait, missing-value fallbacks and
//!   the bundled starting world.
//! - [`runner`] -- The async tick loop with operator controls.
//! - [`snapshot`] -- Render-sink snapshots of the state.
//! - [`state`] -- [`SimulationState`] and its initialization.
//! - [`tick`] -- One base tick across all systems.
//!
//! [`DataProvider`]: provider::DataProvider
//! [`SimulationState`]: state::SimulationState

pub mod clock;
pub mod config;
pub mod journeys;
pub mod operator;
pub mod provider;
pub mod runner;
pub mod snapshot;
pub mod state;
pub mod tick;
