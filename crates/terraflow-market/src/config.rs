//! Typed market parameters.

use serde::Deserialize;

use terraflow_grid::Connectivity;

/// Default global price ceiling: the most any buyer will ever pay.
pub const DEFAULT_MAX_PRICE: f64 = 100.0;

/// How the consume phase adjusts price at a demand point in response to
/// scarcity.
///
/// The source this engine descends from clamped price *up* to the
/// configured maximum (`max(max_price, ...)`), turning the documented
/// ceiling into a floor. Both behaviors are kept selectable so the
/// inversion stays visible instead of being silently resolved; see
/// `DESIGN.md` for the rationale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScarcityPolicy {
    /// Corrected semantics: unmet demand raises price, capped at the
    /// ceiling (`price = min(max_price, price - new_supply)`).
    #[default]
    PriceCeiling,
    /// Faithful to the original source: price is clamped up to
    /// `max_price` (`price = max(max_price, price - new_supply)`).
    LegacyFloor,
}

/// Parameters for an economic diffusion run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MarketConfig {
    /// Global price ceiling.
    #[serde(default = "default_max_price")]
    pub max_price: f64,

    /// Scarcity response in the consume phase.
    #[serde(default)]
    pub scarcity_policy: ScarcityPolicy,

    /// Neighbor relation used for supply movement and price relaxation.
    #[serde(default)]
    pub connectivity: Connectivity,
}

const fn default_max_price() -> f64 {
    DEFAULT_MAX_PRICE
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            max_price: default_max_price(),
            scarcity_policy: ScarcityPolicy::default(),
            connectivity: Connectivity::default(),
        }
    }
}
