//! Error types for the `terraflow-grid` crate.
//!
//! All fallible operations in this crate return [`GridError`] through the
//! standard [`Result`] type alias.

/// Errors that can occur during grid construction and cell addressing.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Grid dimensions were zero or their product overflowed.
    #[error("invalid grid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },

    /// A linear cell index was out of range for the grid.
    #[error("cell index {index} out of range for grid of {len} cells")]
    InvalidIndex {
        /// The offending index.
        index: usize,
        /// Total number of cells in the grid.
        len: usize,
    },

    /// A coordinate pair was outside the grid bounds.
    #[error("coordinates ({x}, {y}) out of range for {width}x{height} grid")]
    InvalidCoordinates {
        /// Requested x coordinate.
        x: usize,
        /// Requested y coordinate.
        y: usize,
        /// Grid width.
        width: usize,
        /// Grid height.
        height: usize,
    },
}
