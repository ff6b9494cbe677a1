//! The per-tick economic diffusion engine.
//!
//! A [`Market`] holds per-cell `price` and `supply` scalars co-indexed
//! with a [`Grid`], plus a sparse set of demand points. Each
//! [`Market::tick`] executes three phases in fixed order:
//!
//! 1. **Move supply** -- up to one unit of supply migrates from each cell
//!    to the adjacent cell with the strictly highest price. Goods flow
//!    toward the best available market.
//! 2. **Update price** -- a single synchronous relaxation pass recomputes
//!    every cell's price from its neighbors' prices minus the movement
//!    cost. Each tick propagates price information one hop farther from
//!    every demand point; the field is always one iteration behind true
//!    equilibrium by design.
//! 3. **Consume** -- each demand point eats into its local supply and
//!    adjusts its price per the configured [`ScarcityPolicy`].
//!
//! Ticks are strictly serialized by the caller; the engine never runs
//! concurrently with itself.

use std::collections::BTreeMap;

use tracing::debug;

use terraflow_grid::Grid;

use crate::config::{MarketConfig, ScarcityPolicy};
use crate::error::MarketError;

/// Per-cell price and supply fields plus sparse demand points.
///
/// Constructed once per simulation run and mutated in place every tick.
/// The market must be built against the same grid it is ticked with; its
/// field length is fixed at construction.
#[derive(Debug, Clone)]
pub struct Market {
    /// Market price of the good, per cell.
    price: Vec<f64>,
    /// Amount of the resource present, per cell. Never negative.
    supply: Vec<f64>,
    /// Per-tick consumption rate at each demand point. Sparse: expected
    /// far smaller than the grid.
    demand: BTreeMap<usize, f64>,
    /// Engine parameters.
    config: MarketConfig,
}

impl Market {
    /// Create an empty market sized for the given grid.
    pub fn new(grid: &Grid, config: MarketConfig) -> Self {
        Self {
            price: vec![0.0; grid.len()],
            supply: vec![0.0; grid.len()],
            demand: BTreeMap::new(),
            config,
        }
    }

    /// Number of cells in the market's fields.
    pub fn len(&self) -> usize {
        self.price.len()
    }

    /// Whether the market has no cells.
    pub fn is_empty(&self) -> bool {
        self.price.is_empty()
    }

    // -------------------------------------------------------------------
    // Setup mutators
    // -------------------------------------------------------------------

    /// Register a demand point with a per-tick consumption rate.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::InvalidIndex`] for an out-of-range cell, or
    /// [`MarketError::InvalidDemandRate`] if the rate is not positive and
    /// finite.
    pub fn add_demand(&mut self, index: usize, rate: f64) -> Result<(), MarketError> {
        if index >= self.price.len() {
            return Err(MarketError::InvalidIndex {
                index,
                len: self.price.len(),
            });
        }
        if !(rate > 0.0 && rate.is_finite()) {
            return Err(MarketError::InvalidDemandRate { index, rate });
        }
        self.demand.insert(index, rate);
        Ok(())
    }

    /// Deposit supply at a cell.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::InvalidIndex`] for an out-of-range cell, or
    /// [`MarketError::InvalidSupplyAmount`] if the amount is negative or
    /// non-finite.
    pub fn add_supply(&mut self, index: usize, amount: f64) -> Result<(), MarketError> {
        if !(amount >= 0.0 && amount.is_finite()) {
            return Err(MarketError::InvalidSupplyAmount { index, amount });
        }
        let slot = self
            .supply
            .get_mut(index)
            .ok_or(MarketError::InvalidIndex {
                index,
                len: self.price.len(),
            })?;
        *slot += amount;
        Ok(())
    }

    // -------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------

    /// Price at a cell.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::InvalidIndex`] for an out-of-range cell.
    pub fn price(&self, index: usize) -> Result<f64, MarketError> {
        self.price.get(index).copied().ok_or(MarketError::InvalidIndex {
            index,
            len: self.price.len(),
        })
    }

    /// Supply at a cell.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::InvalidIndex`] for an out-of-range cell.
    pub fn supply(&self, index: usize) -> Result<f64, MarketError> {
        self.supply.get(index).copied().ok_or(MarketError::InvalidIndex {
            index,
            len: self.price.len(),
        })
    }

    /// The whole price field, co-indexed with linear cell indices.
    /// Intended for visualization consumers.
    pub fn price_field(&self) -> &[f64] {
        &self.price
    }

    /// The whole supply field, co-indexed with linear cell indices.
    pub fn supply_field(&self) -> &[f64] {
        &self.supply
    }

    /// Sum of supply over the whole field.
    pub fn total_supply(&self) -> f64 {
        self.supply.iter().sum()
    }

    // -------------------------------------------------------------------
    // Tick
    // -------------------------------------------------------------------

    /// Advance the simulation by one tick: move supply, relax prices,
    /// consume at demand points. Side effects only; the caller observes
    /// the mutated price and supply fields.
    pub fn tick(&mut self, grid: &Grid) {
        let moved = self.move_supply(grid);
        self.update_price(grid);
        let consumed = self.consume();
        debug!(moved, consumed, total_supply = self.total_supply(), "market tick");
    }

    /// Phase 1: up to one unit of supply moves from each cell to the
    /// adjacent cell with the strictly highest price. Cells are processed
    /// in ascending index order and mutations are visible to later cells
    /// within the same pass. Returns the number of units moved.
    fn move_supply(&mut self, grid: &Grid) -> f64 {
        let mut moved = 0.0;
        for index in 0..self.supply.len() {
            let available = self.supply.get(index).copied().unwrap_or(0.0);
            if available <= 0.0 {
                continue;
            }

            // The best market for these goods is this cell or the
            // neighbor with the strictly highest price.
            let mut destination = index;
            let mut best_price = self.price.get(index).copied().unwrap_or(0.0);
            let Ok(neighbors) = grid.neighbors(index, self.config.connectivity) else {
                continue;
            };
            for (neighbor, _step) in neighbors {
                let neighbor_price = self.price.get(neighbor).copied().unwrap_or(0.0);
                if neighbor_price > best_price {
                    destination = neighbor;
                    best_price = neighbor_price;
                }
            }
            if destination == index {
                // The goods aren't moving anywhere.
                continue;
            }

            let shipment = available.min(1.0);
            if let Some(slot) = self.supply.get_mut(index) {
                *slot -= shipment;
            }
            if let Some(slot) = self.supply.get_mut(destination) {
                *slot += shipment;
            }
            moved += shipment;
        }
        moved
    }

    /// Phase 2: recompute every cell's price as the best price reachable
    /// through a neighbor minus the cost of moving there, floored at the
    /// cell's intrinsic price (its current price for demand points, zero
    /// otherwise). A full single relaxation pass written to a fresh field.
    fn update_price(&mut self, grid: &Grid) {
        let mut next: Vec<f64> = Vec::with_capacity(self.price.len());
        for index in 0..self.price.len() {
            let mut best = if self.demand.contains_key(&index) {
                self.price.get(index).copied().unwrap_or(0.0)
            } else {
                0.0
            };

            let here = grid.elevation(index).unwrap_or(0.0);
            let Ok(neighbors) = grid.neighbors(index, self.config.connectivity) else {
                next.push(best);
                continue;
            };
            for (neighbor, _step) in neighbors {
                let delta = grid.elevation(neighbor).unwrap_or(0.0) - here;
                let move_cost = 1.0 + delta * delta;
                let offered = self.price.get(neighbor).copied().unwrap_or(0.0) - move_cost;
                best = best.max(offered);
            }
            next.push(best);
        }
        self.price = next;
    }

    /// Phase 3: each demand point consumes from its local supply and
    /// adjusts its price per the scarcity policy. Negative interim supply
    /// represents unmet demand and is clamped back to zero after the
    /// price adjustment. Returns the units actually consumed.
    fn consume(&mut self) -> f64 {
        let mut consumed = 0.0;
        for (&index, &want) in &self.demand {
            let old_supply = self.supply.get(index).copied().unwrap_or(0.0);
            let new_supply = old_supply - want;

            if let Some(slot) = self.price.get_mut(index) {
                let adjusted = *slot - new_supply;
                *slot = match self.config.scarcity_policy {
                    ScarcityPolicy::PriceCeiling => adjusted.min(self.config.max_price),
                    ScarcityPolicy::LegacyFloor => adjusted.max(self.config.max_price),
                };
            }
            if let Some(slot) = self.supply.get_mut(index) {
                *slot = new_supply.max(0.0);
            }
            consumed += old_supply.min(want).max(0.0);
        }
        consumed
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use terraflow_grid::Connectivity;

    fn flat_grid(width: usize, height: usize) -> Grid {
        Grid::new(width, height).unwrap()
    }

    fn legacy_config() -> MarketConfig {
        MarketConfig {
            scarcity_policy: ScarcityPolicy::LegacyFloor,
            ..MarketConfig::default()
        }
    }

    // ------------------------------------------------------------------
    // Setup validation
    // ------------------------------------------------------------------

    #[test]
    fn add_demand_rejects_out_of_range() {
        let grid = flat_grid(3, 3);
        let mut market = Market::new(&grid, MarketConfig::default());
        assert!(matches!(
            market.add_demand(9, 1.0),
            Err(MarketError::InvalidIndex { index: 9, len: 9 })
        ));
    }

    #[test]
    fn add_demand_rejects_non_positive_rate() {
        let grid = flat_grid(3, 3);
        let mut market = Market::new(&grid, MarketConfig::default());
        assert!(market.add_demand(4, 0.0).is_err());
        assert!(market.add_demand(4, -1.0).is_err());
        assert!(market.add_demand(4, f64::NAN).is_err());
    }

    #[test]
    fn add_supply_rejects_negative_amount() {
        let grid = flat_grid(3, 3);
        let mut market = Market::new(&grid, MarketConfig::default());
        assert!(market.add_supply(0, -0.5).is_err());
        assert!(market.add_supply(99, 1.0).is_err());
    }

    #[test]
    fn add_supply_accumulates() {
        let grid = flat_grid(3, 3);
        let mut market = Market::new(&grid, MarketConfig::default());
        market.add_supply(2, 1.5).unwrap();
        market.add_supply(2, 0.5).unwrap();
        assert!((market.supply(2).unwrap() - 2.0).abs() < 1e-12);
    }

    // ------------------------------------------------------------------
    // Concrete scenario from the design notes
    // ------------------------------------------------------------------

    #[test]
    fn one_tick_consumes_at_the_demand_point() {
        // 3x3 flat grid, demand point at the center with rate 2.0,
        // starting supply 5.0 there and nowhere else: no inbound
        // migration is possible, so after one tick the supply is exactly
        // the pre-tick amount minus consumption.
        let grid = flat_grid(3, 3);
        let mut market = Market::new(&grid, legacy_config());
        market.add_demand(4, 2.0).unwrap();
        market.add_supply(4, 5.0).unwrap();

        market.tick(&grid);

        assert!((market.supply(4).unwrap() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn demand_point_price_bootstraps_under_legacy_floor() {
        let grid = flat_grid(3, 3);
        let mut market = Market::new(&grid, legacy_config());
        market.add_demand(4, 1.0).unwrap();

        market.tick(&grid);

        // Unmet demand snaps the price up to the configured maximum.
        assert!((market.price(4).unwrap() - 100.0).abs() < 1e-12);
    }

    #[test]
    fn demand_point_price_creeps_under_price_ceiling() {
        let grid = flat_grid(3, 3);
        let mut market = Market::new(&grid, MarketConfig::default());
        market.add_demand(4, 1.0).unwrap();

        market.tick(&grid);
        // One unit of unmet demand raises the price by one.
        assert!((market.price(4).unwrap() - 1.0).abs() < 1e-12);
        market.tick(&grid);
        assert!((market.price(4).unwrap() - 2.0).abs() < 1e-12);
    }

    // ------------------------------------------------------------------
    // Scarcity policy bounds
    // ------------------------------------------------------------------

    #[test]
    fn price_ceiling_never_exceeds_max_price() {
        let grid = flat_grid(4, 4);
        let mut market = Market::new(
            &grid,
            MarketConfig {
                max_price: 10.0,
                ..MarketConfig::default()
            },
        );
        market.add_demand(5, 3.0).unwrap();
        market.add_demand(10, 1.0).unwrap();

        for _ in 0..50 {
            market.tick(&grid);
            for index in [5, 10] {
                assert!(market.price(index).unwrap() <= 10.0 + 1e-12);
            }
        }
    }

    #[test]
    fn legacy_floor_never_drops_below_max_price() {
        let grid = flat_grid(4, 4);
        let mut market = Market::new(
            &grid,
            MarketConfig {
                max_price: 10.0,
                scarcity_policy: ScarcityPolicy::LegacyFloor,
                ..MarketConfig::default()
            },
        );
        market.add_demand(5, 3.0).unwrap();

        for _ in 0..50 {
            market.tick(&grid);
            assert!(market.price(5).unwrap() >= 10.0 - 1e-12);
        }
    }

    // ------------------------------------------------------------------
    // Invariants
    // ------------------------------------------------------------------

    #[test]
    fn supply_never_goes_negative() {
        let grid = flat_grid(6, 6);
        let mut market = Market::new(&grid, legacy_config());
        let mut rng = StdRng::seed_from_u64(7);

        for index in 0..36 {
            if rng.random_range(0.0..1.0) < 0.4 {
                market.add_supply(index, rng.random_range(0.0..3.0)).unwrap();
            }
        }
        market.add_demand(14, 2.5).unwrap();
        market.add_demand(21, 0.75).unwrap();

        for _ in 0..40 {
            market.tick(&grid);
            assert!(market.supply_field().iter().all(|&s| s >= 0.0));
        }
    }

    #[test]
    fn move_phase_conserves_total_supply() {
        // Without demand points nothing is consumed, so ticking only
        // redistributes supply.
        let grid = flat_grid(5, 5);
        let mut market = Market::new(&grid, MarketConfig::default());
        let mut rng = StdRng::seed_from_u64(11);
        for index in 0..25 {
            market.add_supply(index, rng.random_range(0.0..2.0)).unwrap();
        }
        let before = market.total_supply();

        for _ in 0..20 {
            market.tick(&grid);
        }
        assert!((market.total_supply() - before).abs() < 1e-9);
    }

    #[test]
    fn total_supply_shrinks_only_by_consumption() {
        let grid = flat_grid(5, 5);
        let mut market = Market::new(&grid, legacy_config());
        for index in 0..25 {
            market.add_supply(index, 1.0).unwrap();
        }
        market.add_demand(12, 0.5).unwrap();

        let mut previous = market.total_supply();
        for _ in 0..30 {
            market.tick(&grid);
            let current = market.total_supply();
            // Consumption removes at most the demand rate per tick, and
            // nothing is ever created.
            assert!(current <= previous + 1e-12);
            assert!(current >= previous - 0.5 - 1e-12);
            previous = current;
        }
    }

    // ------------------------------------------------------------------
    // Price propagation and supply migration
    // ------------------------------------------------------------------

    #[test]
    fn price_propagates_one_hop_per_tick() {
        let grid = flat_grid(5, 5);
        let mut market = Market::new(&grid, legacy_config());
        let center = grid.linear_index(2, 2).unwrap();
        market.add_demand(center, 1.0).unwrap();

        // Tick 1 bootstraps the demand point itself.
        market.tick(&grid);
        let adjacent = grid.linear_index(2, 1).unwrap();
        assert!(market.price(adjacent).unwrap().abs() < 1e-12);

        // Tick 2 reaches the adjacent ring: 100 minus one unit of flat
        // movement cost.
        market.tick(&grid);
        assert!((market.price(adjacent).unwrap() - 99.0).abs() < 1e-9);

        // Tick 3 reaches the outer ring.
        market.tick(&grid);
        let corner = grid.linear_index(0, 0).unwrap();
        assert!((market.price(corner).unwrap() - 98.0).abs() < 1e-9);
    }

    #[test]
    fn supply_migrates_toward_the_demand_point() {
        let grid = flat_grid(3, 3);
        let mut market = Market::new(&grid, legacy_config());
        let center = grid.linear_index(1, 1).unwrap();
        market.add_demand(center, 0.5).unwrap();
        market.add_supply(0, 2.0).unwrap();

        for _ in 0..4 {
            market.tick(&grid);
        }

        // The corner stock has been shipped out one unit per tick and
        // partially eaten at the market.
        assert!(market.supply(0).unwrap().abs() < 1e-12);
        assert!(market.supply(center).unwrap() > 0.0);
    }

    #[test]
    fn supply_stays_put_without_a_better_price() {
        let grid = flat_grid(3, 3);
        let mut market = Market::new(&grid, MarketConfig::default());
        market.add_supply(4, 3.0).unwrap();

        market.tick(&grid);

        // No demand anywhere: prices are uniformly zero and nothing moves.
        assert!((market.supply(4).unwrap() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn orthogonal_connectivity_restricts_migration() {
        let grid = flat_grid(3, 3);
        let mut market = Market::new(
            &grid,
            MarketConfig {
                connectivity: Connectivity::Orthogonal,
                scarcity_policy: ScarcityPolicy::LegacyFloor,
                ..MarketConfig::default()
            },
        );
        let center = grid.linear_index(1, 1).unwrap();
        market.add_demand(center, 0.1).unwrap();
        market.add_supply(0, 1.0).unwrap();

        // Two ticks: price bootstraps, then reaches the corner's
        // orthogonal neighbors only.
        market.tick(&grid);
        market.tick(&grid);
        // Corner (0,0) is not orthogonally adjacent to the center, so its
        // stock has not shipped directly there.
        assert!(market.supply(center).unwrap().abs() < 1e-12);
    }
}
