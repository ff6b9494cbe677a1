//! Typed search parameters.

use serde::Deserialize;

use terraflow_grid::Connectivity;

/// Default weight on the squared elevation delta in the edge cost. Large
/// enough that elevation discontinuities dominate pure distance, so the
/// search strongly prefers gentle grades over short routes.
pub const DEFAULT_ELEVATION_WEIGHT: f64 = 1.0e6;

/// Parameters for a shortest-path search.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchConfig {
    /// Neighbor relation used when expanding cells.
    #[serde(default)]
    pub connectivity: Connectivity,

    /// Weight `K` in the edge cost `step + K * (dh)^2`. Useful values lie
    /// in `1e6..=1e8`.
    #[serde(default = "default_elevation_weight")]
    pub elevation_weight: f64,

    /// Whether to add the straight-line Euclidean lower bound toward the
    /// opposing endpoint to each queue priority. Admissible because every
    /// step costs at least its geometric length.
    #[serde(default = "default_use_heuristic")]
    pub use_heuristic: bool,
}

const fn default_elevation_weight() -> f64 {
    DEFAULT_ELEVATION_WEIGHT
}

const fn default_use_heuristic() -> bool {
    true
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            connectivity: Connectivity::default(),
            elevation_weight: default_elevation_weight(),
            use_heuristic: default_use_heuristic(),
        }
    }
}
