//! Typed propagation parameters.

use serde::Deserialize;

use terraflow_grid::Connectivity;

/// Default multiplier on the absolute elevation delta before it is raised
/// to the fifth power. At this scale a delta of one part in ten thousand
/// already contributes a full unit of cost, so fronts hug contours and
/// surge through flat terrain.
pub const DEFAULT_ELEVATION_SCALE: f64 = 1.0e4;

/// Default bound on the record channel between producer and consumer.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Parameters for a growth propagation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GrowthConfig {
    /// Neighbor relation used when expanding the frontier.
    #[serde(default)]
    pub connectivity: Connectivity,

    /// Multiplier applied to the elevation delta before the fifth-power
    /// penalty.
    #[serde(default = "default_elevation_scale")]
    pub elevation_scale: f64,

    /// Capacity of the bounded record channel; a full buffer suspends the
    /// producer until the consumer catches up.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

const fn default_elevation_scale() -> f64 {
    DEFAULT_ELEVATION_SCALE
}

const fn default_channel_capacity() -> usize {
    DEFAULT_CHANNEL_CAPACITY
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            connectivity: Connectivity::default(),
            elevation_scale: default_elevation_scale(),
            channel_capacity: default_channel_capacity(),
        }
    }
}
