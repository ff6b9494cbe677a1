//! Elevation field and neighbor topology for the Terraflow engines.
//!
//! This crate is the leaf of the workspace: it owns the flattened
//! `width x height` elevation array, derives 4- and 8-connected neighbor
//! sets with geometric step costs, and normalizes raw noise samples into
//! a `[0, 1]` field. The pathfinder, growth propagator, and market engine
//! all consume the same immutable [`Grid`] and are independent of each
//! other.
//!
//! # Modules
//!
//! - [`config`] -- Typed YAML configuration for grid generation.
//! - [`error`] -- Error types for grid construction and cell addressing.
//! - [`grid`] -- The [`Grid`] itself: addressing, neighbor queries, fill.
//! - [`source`] -- The [`ElevationSource`] capability the fill step samples.

pub mod config;
pub mod error;
pub mod grid;
pub mod source;

// Re-export primary types at crate root.
pub use config::{ConfigError, GridConfig};
pub use error::GridError;
pub use grid::{Connectivity, DEFAULT_INV_MAX_SCALE, Grid, SQRT_2};
pub use source::ElevationSource;
