//! Geography and demographics for the Contagion simulation.
//!
//! This crate models the physical world the resources spread across:
//! countries as a directed border graph, a population model with linear
//! growth, great-circle vehicle kinematics, and the airports journeys fly
//! between.
//!
//! # Modules
//!
//! - [`country_graph`] -- [`CountryGraph`]: countries as nodes, borders as edges.
//! - [`population`] -- [`PopulationModel`]: baseline plus linear growth, migration.
//! - [`geodesic`] -- Haversine paths, vehicle advance and altitude profile.
//! - [`airports`] -- Filtering and per-continent random selection.
//! - [`numeric`] -- Saturating float/integer conversions shared by the rules.
//! - [`error`] -- Error types for world operations.

pub mod airports;
pub mod country_graph;
pub mod error;
pub mod geodesic;
pub mod numeric;
pub mod population;

// Re-export primary types at crate root.
pub use airports::{choose_route, select_airports, usable_airports};
pub use country_graph::CountryGraph;
pub use error::WorldError;
pub use geodesic::{Path, Vehicle};
pub use population::PopulationModel;
