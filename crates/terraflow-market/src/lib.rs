//! Per-tick economic diffusion over a Terraflow grid.
//!
//! Supply migrates one unit at a time toward the adjacent cell offering
//! the best price, prices relax outward from demand points one hop per
//! tick with an elevation-dependent movement cost, and demand points
//! consume local supply while pushing their price per the configured
//! scarcity policy.
//!
//! # Modules
//!
//! - [`config`] -- Typed engine parameters and the scarcity policy.
//! - [`error`] -- Error types for market setup.
//! - [`market`] -- The price/supply fields and the three-phase tick.

pub mod config;
pub mod error;
pub mod market;

// Re-export primary types at crate root.
pub use config::{DEFAULT_MAX_PRICE, MarketConfig, ScarcityPolicy};
pub use error::MarketError;
pub use market::Market;
