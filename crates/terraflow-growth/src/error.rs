//! Error types for the `terraflow-growth` crate.

use terraflow_grid::GridError;

/// Errors that can occur when starting a propagation.
#[derive(Debug, thiserror::Error)]
pub enum GrowthError {
    /// The seed index was out of range for the grid.
    #[error("seed index {index} out of range for grid of {len} cells")]
    InvalidSeed {
        /// The offending seed index.
        index: usize,
        /// Total number of cells in the grid.
        len: usize,
    },

    /// A grid query failed while seeding the traversal.
    #[error("grid error during propagation: {source}")]
    Grid {
        /// The underlying grid error.
        #[from]
        source: GridError,
    },
}
