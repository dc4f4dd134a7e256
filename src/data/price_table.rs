//! Sparse multi-asset price history

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A single closing-price observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Asset symbol (e.g. "BTC")
    pub asset: String,
    /// Period start time, unix seconds aligned to the interval grid
    pub time: i64,
    /// Closing price of the period
    pub close: f64,
}

/// Full price history of the asset universe.
///
/// Logically a sparse mapping from `(asset, time)` to closing price: not
/// every asset has an observation at every timestamp, and absent pairs stay
/// absent rather than being filled in.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    points: Vec<PricePoint>,
}

impl PriceTable {
    pub fn new(points: Vec<PricePoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn push(&mut self, point: PricePoint) {
        self.points.push(point);
    }

    pub fn extend(&mut self, points: impl IntoIterator<Item = PricePoint>) {
        self.points.extend(points);
    }

    /// Latest observation time across all assets
    pub fn last_time(&self) -> Option<i64> {
        self.points.iter().map(|p| p.time).max()
    }

    /// All distinct observation times, ascending
    pub fn distinct_times(&self) -> Vec<i64> {
        let times: BTreeSet<i64> = self.points.iter().map(|p| p.time).collect();
        times.into_iter().collect()
    }

    /// Sub-table of observations with `time > cutoff`
    pub fn after(&self, cutoff: i64) -> PriceTable {
        PriceTable {
            points: self
                .points
                .iter()
                .filter(|p| p.time > cutoff)
                .cloned()
                .collect(),
        }
    }

    /// Sub-table of observations with `start <= time <= end`
    pub fn between(&self, start: i64, end: i64) -> PriceTable {
        PriceTable {
            points: self
                .points
                .iter()
                .filter(|p| p.time >= start && p.time <= end)
                .cloned()
                .collect(),
        }
    }
}
