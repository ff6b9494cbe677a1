//! Error types for the `terraflow-market` crate.

/// Errors that can occur when mutating a market.
#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    /// A cell index was out of range for the market's field.
    #[error("cell index {index} out of range for market of {len} cells")]
    InvalidIndex {
        /// The offending index.
        index: usize,
        /// Total number of cells in the market.
        len: usize,
    },

    /// A demand point was registered with a non-positive consumption rate.
    #[error("demand rate {rate} at cell {index} must be positive")]
    InvalidDemandRate {
        /// The demand point cell.
        index: usize,
        /// The rejected rate.
        rate: f64,
    },

    /// A supply deposit was negative or non-finite.
    #[error("supply amount {amount} at cell {index} must be non-negative and finite")]
    InvalidSupplyAmount {
        /// The target cell.
        index: usize,
        /// The rejected amount.
        amount: f64,
    },
}
