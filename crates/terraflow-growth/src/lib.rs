//! Cost-ordered flood propagation ("growth") over a Terraflow grid.
//!
//! From a single seed cell, the propagator visits the whole grid in
//! non-decreasing cumulative-cost order and emits each cell exactly once.
//! The traversal is lazy: consumers can process records while the frontier
//! is still expanding. The streaming layer runs the traversal as a
//! background producer feeding a bounded, ordered channel with
//! backpressure.
//!
//! # Modules
//!
//! - [`config`] -- Typed propagation parameters.
//! - [`error`] -- Error types for seeding a propagation.
//! - [`walk`] -- The lazy Dijkstra-style traversal as an [`Iterator`].
//! - [`stream`] -- Background producer feeding a bounded tokio channel.

pub mod config;
pub mod error;
pub mod stream;
pub mod walk;

// Re-export primary types at crate root.
pub use config::{DEFAULT_CHANNEL_CAPACITY, DEFAULT_ELEVATION_SCALE, GrowthConfig};
pub use error::GrowthError;
pub use stream::stream;
pub use walk::{GrowthRecord, GrowthWalk};
