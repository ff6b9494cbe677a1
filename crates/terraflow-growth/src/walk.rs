//! The lazy cost-ordered traversal underlying growth propagation.
//!
//! [`GrowthWalk`] is a single-source Dijkstra-style relaxation over the
//! grid, surfaced as an [`Iterator`]: each `next()` call finalizes and
//! yields exactly one cell, in non-decreasing cumulative-cost order, until
//! every reachable cell has been emitted once. The traversal is lazy and
//! not restartable -- consumers may process records while the frontier is
//! still expanding, with no requirement that the full field be computed
//! before the first record is delivered.
//!
//! The edge cost from `u` to neighbor `v` is the grid's true geometric
//! step cost plus `(|elevation(u) - elevation(v)| * scale)^5`. The steep
//! fifth-power penalty makes propagation fronts hug contours and surge
//! through flat terrain.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;

use terraflow_grid::Grid;

use crate::config::GrowthConfig;
use crate::error::GrowthError;

/// One finalized cell of the propagation, emitted at most once per index
/// over the traversal's lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthRecord {
    /// The finalized cell.
    pub index: usize,
    /// Elevation at that cell.
    pub elevation: f64,
    /// Cumulative propagation cost from the seed.
    pub cost: f64,
}

/// Min-queue adapter over [`BinaryHeap`]'s max-heap ordering, keyed on
/// cumulative cost with the cell index as a deterministic tie-break.
#[derive(Debug)]
struct QueueEntry(GrowthRecord);

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .0
            .cost
            .total_cmp(&self.0.cost)
            .then_with(|| other.0.index.cmp(&self.0.index))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

/// Lazy single-source cost-ordered traversal of the whole grid.
///
/// Duplicates already queued for an emitted cell are discarded lazily on
/// pop, so each cell reaches the consumer exactly once.
#[derive(Debug)]
pub struct GrowthWalk {
    /// Shared read-only grid snapshot.
    grid: Arc<Grid>,
    /// Propagation parameters.
    config: GrowthConfig,
    /// Cells already emitted.
    visited: Vec<bool>,
    /// Frontier keyed by cumulative cost.
    queue: BinaryHeap<QueueEntry>,
}

impl GrowthWalk {
    /// Seed a traversal at one cell.
    ///
    /// # Errors
    ///
    /// Returns [`GrowthError::InvalidSeed`] if the seed index is out of
    /// range.
    pub fn new(grid: Arc<Grid>, seed: usize, config: GrowthConfig) -> Result<Self, GrowthError> {
        if !grid.contains(seed) {
            return Err(GrowthError::InvalidSeed {
                index: seed,
                len: grid.len(),
            });
        }
        let elevation = grid.elevation(seed)?;

        let mut queue = BinaryHeap::new();
        queue.push(QueueEntry(GrowthRecord {
            index: seed,
            elevation,
            cost: 0.0,
        }));

        Ok(Self {
            visited: vec![false; grid.len()],
            grid,
            config,
            queue,
        })
    }

    /// Whether a cell has already been emitted.
    fn emitted(&self, index: usize) -> bool {
        self.visited.get(index).copied().unwrap_or(true)
    }

    /// Mark a cell as emitted.
    fn mark(&mut self, index: usize) {
        if let Some(slot) = self.visited.get_mut(index) {
            *slot = true;
        }
    }
}

impl Iterator for GrowthWalk {
    type Item = GrowthRecord;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(QueueEntry(record)) = self.queue.pop() {
            if self.emitted(record.index) {
                // Lazily discard duplicates that were already queued when
                // a cheaper entry finalized this cell.
                continue;
            }
            self.mark(record.index);

            let Ok(neighbors) = self.grid.neighbors(record.index, self.config.connectivity)
            else {
                return Some(record);
            };
            for (neighbor, step) in neighbors {
                if self.emitted(neighbor) {
                    continue;
                }
                let Ok(elevation) = self.grid.elevation(neighbor) else {
                    continue;
                };
                let delta = (record.elevation - elevation).abs() * self.config.elevation_scale;
                let cost = record.cost + step + delta.powi(5);
                self.queue.push(QueueEntry(GrowthRecord {
                    index: neighbor,
                    elevation,
                    cost,
                }));
            }

            return Some(record);
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // At most one record per not-yet-emitted cell.
        let remaining = self.visited.iter().filter(|&&v| !v).count();
        (usize::from(remaining > 0 && !self.queue.is_empty()), Some(remaining))
    }
}
