//! Bidirectional best-first search with an elevation-penalized cost metric.
//!
//! Two frontiers expand concurrently from the start cell (origin
//! [`Origin::Start`]) and the goal cell (origin [`Origin::End`]) out of a
//! single shared priority queue keyed by accumulated cost, optionally plus
//! an admissible straight-line heuristic toward the opposing endpoint. The
//! search terminates the instant a popped cell has already been finalized
//! by the *opposite* origin -- that cell is the meeting point, and the two
//! predecessor chains are spliced into the full path.
//!
//! Stepping from cell `u` to neighbor `v` costs
//! `step_cost(u, v) + K * (elevation(u) - elevation(v))^2`. The metric is a
//! symmetric function of the unordered pair, so searching `a -> b` and
//! `b -> a` yields cost-equal reversed paths.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::debug;

use terraflow_grid::Grid;

use crate::config::SearchConfig;
use crate::error::RouteError;

/// Which endpoint a search frontier originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// The frontier expanding from the `from` cell.
    Start,
    /// The frontier expanding from the `to` cell.
    End,
}

impl Origin {
    /// The opposing frontier.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Start => Self::End,
            Self::End => Self::Start,
        }
    }

    /// Stable rank used only as a deterministic queue tie-break.
    const fn rank(self) -> u8 {
        match self {
            Self::Start => 0,
            Self::End => 1,
        }
    }
}

/// The lowest-cost route between two cells.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePath {
    /// Ordered cell indices, first element `from`, last element `to`.
    pub cells: Vec<usize>,
    /// Total accumulated cost of the route under the search metric.
    pub cost: f64,
}

/// Working state for one frontier entry. Owned exclusively by a single
/// search invocation and discarded on completion.
#[derive(Debug, Clone, Copy)]
struct SearchNode {
    /// The cell this entry would finalize.
    index: usize,
    /// The cell it was reached from, `None` for a frontier root.
    predecessor: Option<usize>,
    /// Which endpoint this entry's frontier started at.
    origin: Origin,
    /// Accumulated cost from the frontier root.
    cost: f64,
    /// Queue key: accumulated cost, optionally plus the heuristic.
    priority: f64,
}

/// Min-queue adapter over [`BinaryHeap`]'s max-heap ordering. Ties break on
/// cell index, then origin, for deterministic expansion order.
#[derive(Debug)]
struct QueueEntry(SearchNode);

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .0
            .priority
            .total_cmp(&self.0.priority)
            .then_with(|| other.0.index.cmp(&self.0.index))
            .then_with(|| other.0.origin.rank().cmp(&self.0.origin.rank()))
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

/// Best known finalization of a cell. Once a cell is claimed for an origin,
/// no cheaper path from that origin can still be pending (edge costs are
/// monotonic and non-negative).
#[derive(Debug, Clone, Copy)]
struct Claim {
    /// The origin whose frontier finalized this cell first.
    origin: Origin,
    /// Predecessor toward that origin's root, `None` at the root itself.
    predecessor: Option<usize>,
    /// Accumulated cost from that origin's root.
    cost: f64,
}

/// Find the lowest-cost route between two cells of an immutable grid.
///
/// Pure, deterministic, single-shot: the call either runs to completion or
/// fails; there are no retries and no partial results.
///
/// # Errors
///
/// Returns [`RouteError::InvalidIndex`] if either endpoint is out of range,
/// and [`RouteError::NoPathFound`] if the queue is exhausted without the
/// frontiers meeting (only possible on a disconnected grid).
pub fn shortest_path(
    grid: &Grid,
    from: usize,
    to: usize,
    config: &SearchConfig,
) -> Result<RoutePath, RouteError> {
    for endpoint in [from, to] {
        if !grid.contains(endpoint) {
            return Err(RouteError::InvalidIndex {
                index: endpoint,
                len: grid.len(),
            });
        }
    }

    if from == to {
        return Ok(RoutePath {
            cells: vec![from],
            cost: 0.0,
        });
    }

    let mut claims: Vec<Option<Claim>> = vec![None; grid.len()];
    let mut queue = BinaryHeap::new();

    queue.push(QueueEntry(SearchNode {
        index: from,
        predecessor: None,
        origin: Origin::Start,
        cost: 0.0,
        priority: heuristic(grid, from, to, config)?,
    }));
    queue.push(QueueEntry(SearchNode {
        index: to,
        predecessor: None,
        origin: Origin::End,
        cost: 0.0,
        priority: heuristic(grid, to, from, config)?,
    }));

    let mut expanded: usize = 0;

    while let Some(QueueEntry(node)) = queue.pop() {
        if let Some(settled) = claims.get(node.index).copied().flatten() {
            if settled.origin == node.origin {
                // Stale duplicate: this cell was already finalized cheaper.
                continue;
            }
            // The frontiers met.
            let path = splice(&claims, &node, &settled);
            debug!(
                from,
                to,
                meeting = node.index,
                expanded,
                cells = path.cells.len(),
                cost = path.cost,
                "bidirectional search complete"
            );
            return Ok(path);
        }

        if let Some(slot) = claims.get_mut(node.index) {
            *slot = Some(Claim {
                origin: node.origin,
                predecessor: node.predecessor,
                cost: node.cost,
            });
        }
        expanded = expanded.saturating_add(1);

        let target = match node.origin {
            Origin::Start => to,
            Origin::End => from,
        };
        let here = grid.elevation(node.index)?;

        for (neighbor, step) in grid.neighbors(node.index, config.connectivity)? {
            let finalized_for_us = claims
                .get(neighbor)
                .copied()
                .flatten()
                .is_some_and(|c| c.origin == node.origin);
            if finalized_for_us {
                continue;
            }

            let dh = here - grid.elevation(neighbor)?;
            let cost = node.cost + step + config.elevation_weight * dh * dh;
            let priority = if config.use_heuristic {
                cost + euclidean(grid, neighbor, target)?
            } else {
                cost
            };

            queue.push(QueueEntry(SearchNode {
                index: neighbor,
                predecessor: Some(node.index),
                origin: node.origin,
                cost,
                priority,
            }));
        }
    }

    Err(RouteError::NoPathFound { from, to })
}

/// Queue priority of a frontier root.
fn heuristic(grid: &Grid, index: usize, target: usize, config: &SearchConfig) -> Result<f64, RouteError> {
    if config.use_heuristic {
        euclidean(grid, index, target)
    } else {
        Ok(0.0)
    }
}

/// Straight-line distance between two cells in grid units. A lower bound on
/// the remaining cost: every step costs at least the geometric distance it
/// covers, and the elevation penalty is non-negative.
fn euclidean(grid: &Grid, a: usize, b: usize) -> Result<f64, RouteError> {
    let (ax, ay) = grid.cell_coords(a)?;
    let (bx, by) = grid.cell_coords(b)?;
    #[allow(clippy::cast_precision_loss)]
    let dx = ax.abs_diff(bx) as f64;
    #[allow(clippy::cast_precision_loss)]
    let dy = ay.abs_diff(by) as f64;
    Ok(dx.hypot(dy))
}

/// Splice the two predecessor chains at the meeting cell into one path
/// running from the start root to the end root.
fn splice(claims: &[Option<Claim>], arrived: &SearchNode, settled: &Claim) -> RoutePath {
    let (start_pred, end_pred) = match arrived.origin {
        Origin::Start => (arrived.predecessor, settled.predecessor),
        Origin::End => (settled.predecessor, arrived.predecessor),
    };

    let mut cells = walk_chain(claims, start_pred);
    cells.reverse();
    cells.push(arrived.index);
    cells.extend(walk_chain(claims, end_pred));

    RoutePath {
        cells,
        cost: arrived.cost + settled.cost,
    }
}

/// Walk a predecessor chain outward from the meeting cell to its frontier
/// root, nearest cell first. Claims form a tree, so the walk terminates.
fn walk_chain(claims: &[Option<Claim>], start: Option<usize>) -> Vec<usize> {
    let mut chain = Vec::new();
    let mut cursor = start;
    while let Some(index) = cursor {
        chain.push(index);
        cursor = claims
            .get(index)
            .copied()
            .flatten()
            .and_then(|claim| claim.predecessor);
    }
    chain
}
