//! The external elevation-sampling capability.
//!
//! Noise generation is a collaborator, not part of the core: the grid asks
//! an [`ElevationSource`] for one sample per cell at a caller-chosen
//! frequency scale and normalizes whatever comes back. No bounds are
//! assumed on the source's output.

/// A capability that produces raw elevation samples over continuous space.
///
/// Implementations are typically fractal or value noise generators. The
/// output range is unconstrained; [`Grid::fill`] min-max rescales the
/// sampled field to `[0, 1]` afterwards.
///
/// [`Grid::fill`]: crate::Grid::fill
pub trait ElevationSource {
    /// Sample the raw elevation at the given point.
    fn sample(&self, x: f64, y: f64) -> f64;
}

impl<F> ElevationSource for F
where
    F: Fn(f64, f64) -> f64,
{
    fn sample(&self, x: f64, y: f64) -> f64 {
        self(x, y)
    }
}
