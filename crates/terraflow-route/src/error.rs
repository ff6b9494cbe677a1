//! Error types for the `terraflow-route` crate.

use terraflow_grid::GridError;

/// Errors that can occur during a shortest-path search.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// An endpoint index was out of range for the grid.
    #[error("cell index {index} out of range for grid of {len} cells")]
    InvalidIndex {
        /// The offending index.
        index: usize,
        /// Total number of cells in the grid.
        len: usize,
    },

    /// The search exhausted its queue without the two frontiers meeting.
    /// Only possible on a disconnected or mis-specified grid.
    #[error("no path found from {from} to {to}")]
    NoPathFound {
        /// Search start cell.
        from: usize,
        /// Search goal cell.
        to: usize,
    },

    /// A grid query failed during search.
    #[error("grid error during search: {source}")]
    Grid {
        /// The underlying grid error.
        #[from]
        source: GridError,
    },
}
