//! The elevation grid: a flat 2D scalar field with derived neighbor topology.
//!
//! A [`Grid`] owns a flattened `width x height` elevation array addressed by
//! linear index (`index = x * height + y`, row-major by `x` outer, `y`
//! inner). The neighbor relation is derived on demand, never stored, in two
//! variants: 4-connected ([`Connectivity::Orthogonal`]) and 8-connected
//! ([`Connectivity::Octile`], diagonal step cost `sqrt(2)`).
//!
//! # Lifecycle
//!
//! A grid is constructed once, filled once from an [`ElevationSource`], and
//! treated as immutable afterwards. The fill step performs one min/max pass
//! and one rescale pass so the final field spans exactly `[0, 1]` -- raw
//! noise output carries no bounds guarantee, so two passes are required.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GridError;
use crate::source::ElevationSource;

/// Step cost of a diagonal move between 8-connected cells.
pub const SQRT_2: f64 = std::f64::consts::SQRT_2;

/// Default inverse sampling scale: one grid unit covers 1/400 of a noise
/// unit, controlling terrain feature frequency.
pub const DEFAULT_INV_MAX_SCALE: f64 = 1.0 / 400.0;

/// Which neighbor relation to derive for a cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    /// 4-connected: axis-aligned neighbors only, step cost 1.0.
    Orthogonal,
    /// 8-connected: axis-aligned plus diagonals, diagonal step cost `sqrt(2)`.
    #[default]
    Octile,
}

/// Axis-aligned step offsets.
const ORTHOGONAL_STEPS: [(isize, isize); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// Diagonal step offsets.
const DIAGONAL_STEPS: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// The flat elevation field and its addressing scheme.
///
/// Elevation values are normalized to `[0, 1]` after [`Grid::fill`]. Edge
/// cells have fewer neighbors; there is no wraparound.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// Number of columns.
    width: usize,
    /// Number of rows.
    height: usize,
    /// Flattened elevation field, `width * height` values.
    elevation: Vec<f64>,
}

impl Grid {
    /// Create a zero-filled grid.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDimensions`] if either dimension is zero
    /// or the cell count overflows.
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }
        let len = width
            .checked_mul(height)
            .ok_or(GridError::InvalidDimensions { width, height })?;
        Ok(Self {
            width,
            height,
            elevation: vec![0.0; len],
        })
    }

    /// Number of columns.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells (`width * height`).
    pub fn len(&self) -> usize {
        self.elevation.len()
    }

    /// Whether the grid has no cells. Construction rejects zero dimensions,
    /// so this is always `false` for a successfully built grid.
    pub fn is_empty(&self) -> bool {
        self.elevation.is_empty()
    }

    /// Whether a linear index addresses a cell of this grid.
    pub fn contains(&self, index: usize) -> bool {
        index < self.elevation.len()
    }

    // -------------------------------------------------------------------
    // Addressing
    // -------------------------------------------------------------------

    /// Convert an `(x, y)` coordinate pair into a linear cell index.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidCoordinates`] if either coordinate is
    /// out of bounds.
    pub fn linear_index(&self, x: usize, y: usize) -> Result<usize, GridError> {
        if x >= self.width || y >= self.height {
            return Err(GridError::InvalidCoordinates {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        // Bounds were checked above, so the index fits in the field.
        let base = x
            .checked_mul(self.height)
            .ok_or(GridError::InvalidCoordinates {
                x,
                y,
                width: self.width,
                height: self.height,
            })?;
        base.checked_add(y).ok_or(GridError::InvalidCoordinates {
            x,
            y,
            width: self.width,
            height: self.height,
        })
    }

    /// Convert a linear cell index back into `(x, y)` coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidIndex`] if the index is out of range.
    pub fn cell_coords(&self, index: usize) -> Result<(usize, usize), GridError> {
        if !self.contains(index) {
            return Err(GridError::InvalidIndex {
                index,
                len: self.elevation.len(),
            });
        }
        let x = index.checked_div(self.height).unwrap_or(0);
        let y = index.checked_rem(self.height).unwrap_or(0);
        Ok((x, y))
    }

    // -------------------------------------------------------------------
    // Elevation queries
    // -------------------------------------------------------------------

    /// Elevation at a cell, in `[0, 1]` after [`Grid::fill`].
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidIndex`] if the index is out of range.
    pub fn elevation(&self, index: usize) -> Result<f64, GridError> {
        self.elevation
            .get(index)
            .copied()
            .ok_or(GridError::InvalidIndex {
                index,
                len: self.elevation.len(),
            })
    }

    /// The whole elevation field, co-indexed with linear cell indices.
    /// Intended for visualization consumers that rasterize the field.
    pub fn elevation_field(&self) -> &[f64] {
        &self.elevation
    }

    // -------------------------------------------------------------------
    // Neighbor relation
    // -------------------------------------------------------------------

    /// Return `(neighbor index, step cost)` pairs for a cell.
    ///
    /// Step cost is 1.0 for axis-aligned moves and `sqrt(2)` for diagonal
    /// moves under [`Connectivity::Octile`]. Edge cells yield fewer
    /// neighbors; there is no wraparound.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidIndex`] if the index is out of range.
    pub fn neighbors(
        &self,
        index: usize,
        connectivity: Connectivity,
    ) -> Result<Vec<(usize, f64)>, GridError> {
        let (x, y) = self.cell_coords(index)?;

        let mut result = Vec::with_capacity(8);
        self.push_steps(&mut result, x, y, &ORTHOGONAL_STEPS, 1.0);
        if connectivity == Connectivity::Octile {
            self.push_steps(&mut result, x, y, &DIAGONAL_STEPS, SQRT_2);
        }
        Ok(result)
    }

    /// Push the in-bounds neighbors reached by the given step offsets.
    fn push_steps(
        &self,
        result: &mut Vec<(usize, f64)>,
        x: usize,
        y: usize,
        steps: &[(isize, isize)],
        step_cost: f64,
    ) {
        for &(dx, dy) in steps {
            let Some(nx) = x.checked_add_signed(dx) else {
                continue;
            };
            let Some(ny) = y.checked_add_signed(dy) else {
                continue;
            };
            if nx >= self.width || ny >= self.height {
                continue;
            }
            if let Ok(neighbor) = self.linear_index(nx, ny) {
                result.push((neighbor, step_cost));
            }
        }
    }

    // -------------------------------------------------------------------
    // Fill and normalization
    // -------------------------------------------------------------------

    /// Fill the elevation field from an external source and normalize it.
    ///
    /// Calls `source.sample` once per cell at `(x * inv_scale, y * inv_scale)`,
    /// tracking the min and max of the raw field, then rescales every value
    /// so the field spans exactly `[0, 1]`. A degenerate field (max equals
    /// min, or non-finite span) normalizes to all zeros.
    pub fn fill(&mut self, source: &dyn ElevationSource, inv_scale: f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        let mut slots = self.elevation.iter_mut();
        for x in 0..self.width {
            #[allow(clippy::cast_precision_loss)]
            let px = x as f64 * inv_scale;
            for y in 0..self.height {
                #[allow(clippy::cast_precision_loss)]
                let py = y as f64 * inv_scale;
                let raw = source.sample(px, py);
                min = min.min(raw);
                max = max.max(raw);
                if let Some(slot) = slots.next() {
                    *slot = raw;
                }
            }
        }

        let span = max - min;
        if span > 0.0 && span.is_finite() {
            for value in &mut self.elevation {
                *value = (*value - min) / span;
            }
        } else {
            // Flat or pathological source -- define the field as sea level.
            for value in &mut self.elevation {
                *value = 0.0;
            }
        }

        debug!(
            width = self.width,
            height = self.height,
            raw_min = min,
            raw_max = max,
            "elevation field filled and normalized"
        );
    }
}
