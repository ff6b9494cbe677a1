//! Elevation-penalized shortest-path search over a Terraflow grid.
//!
//! Routes are found with a bidirectional best-first search: two frontiers
//! expand from the endpoints out of one shared priority queue, each edge
//! costing its geometric step length plus a weighted squared elevation
//! delta, and the search ends the first time the frontiers touch. The
//! result is the full cell sequence with its accumulated cost.
//!
//! # Modules
//!
//! - [`config`] -- Typed search parameters.
//! - [`error`] -- Error types for a search invocation.
//! - [`search`] -- The bidirectional search and path splicing.

pub mod config;
pub mod error;
pub mod search;

// Re-export primary types at crate root.
pub use config::{DEFAULT_ELEVATION_WEIGHT, SearchConfig};
pub use error::RouteError;
pub use search::{Origin, RoutePath, shortest_path};
