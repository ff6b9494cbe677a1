//! Streaming delivery of growth records over a bounded channel.
//!
//! Propagation runs as an independent producer task feeding an ordered
//! [`tokio::sync::mpsc`] channel. The producer and consumer execute
//! concurrently; when the buffer is full, `send` suspends the producer
//! until the consumer drains, so no record is ever lost or reordered. The
//! channel closes after the last record, which is how consumers detect
//! completion -- cells on isolated subgraphs are signaled only by the
//! close, never by a record.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use terraflow_grid::Grid;

use crate::config::GrowthConfig;
use crate::error::GrowthError;
use crate::walk::{GrowthRecord, GrowthWalk};

/// Start a propagation from `seed` and return the receiving end of its
/// record stream.
///
/// The producer stops early if the receiver is dropped; otherwise it runs
/// until the whole reachable grid has been emitted and then closes the
/// channel.
///
/// # Errors
///
/// Returns [`GrowthError::InvalidSeed`] if the seed index is out of range.
pub fn stream(
    grid: Arc<Grid>,
    seed: usize,
    config: GrowthConfig,
) -> Result<mpsc::Receiver<GrowthRecord>, GrowthError> {
    let capacity = config.channel_capacity.max(1);
    let walk = GrowthWalk::new(grid, seed, config)?;
    let (tx, rx) = mpsc::channel(capacity);

    tokio::spawn(async move {
        let mut emitted: usize = 0;
        for record in walk {
            if tx.send(record).await.is_err() {
                debug!(seed, emitted, "growth consumer dropped, stopping producer");
                return;
            }
            emitted = emitted.saturating_add(1);
        }
        debug!(seed, emitted, "growth propagation complete");
    });

    Ok(rx)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn flat_grid(width: usize, height: usize) -> Arc<Grid> {
        Arc::new(Grid::new(width, height).unwrap())
    }

    #[tokio::test]
    async fn invalid_seed_fails_before_spawning() {
        let grid = flat_grid(3, 3);
        assert!(stream(grid, 9, GrowthConfig::default()).is_err());
    }

    #[tokio::test]
    async fn stream_closes_after_last_record() {
        let grid = flat_grid(4, 4);
        let mut rx = stream(grid, 0, GrowthConfig::default()).unwrap();
        let mut count = 0_usize;
        while let Some(_record) = rx.recv().await {
            count += 1;
        }
        assert_eq!(count, 16);
        // Channel is closed; further receives yield None immediately.
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn records_arrive_in_cost_order() {
        let grid = flat_grid(6, 6);
        let mut rx = stream(grid, 14, GrowthConfig::default()).unwrap();
        let mut previous = f64::NEG_INFINITY;
        while let Some(record) = rx.recv().await {
            assert!(record.cost >= previous);
            previous = record.cost;
        }
    }

    #[tokio::test]
    async fn tiny_buffer_applies_backpressure_without_loss() {
        // A one-slot channel forces the producer to suspend on every
        // record; the full field must still arrive exactly once, in order.
        let grid = flat_grid(8, 8);
        let config = GrowthConfig {
            channel_capacity: 1,
            ..GrowthConfig::default()
        };
        let mut rx = stream(grid, 0, config).unwrap();

        let mut seen = vec![false; 64];
        while let Some(record) = rx.recv().await {
            assert!(!seen[record.index], "duplicate record {}", record.index);
            seen[record.index] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[tokio::test]
    async fn dropping_consumer_stops_producer() {
        let grid = flat_grid(64, 64);
        let config = GrowthConfig {
            channel_capacity: 4,
            ..GrowthConfig::default()
        };
        let mut rx = stream(grid, 0, config).unwrap();
        // Take a few records, then walk away.
        let first = rx.recv().await.unwrap();
        assert_eq!(first.index, 0);
        let _second = rx.recv().await.unwrap();
        drop(rx);
        // Nothing to assert beyond not hanging: the producer observes the
        // closed channel on its next send and returns.
    }
}
