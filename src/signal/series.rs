//! Signal series computation and incremental maintenance

use super::spectral::{eigen_gap, smoothed_spectrum};
use super::store::SignalStore;
use super::window::WindowSample;
use crate::clock::{last_complete_period, Interval};
use crate::config::SignalConfig;
use crate::data::{simple_returns, PriceTable};
use crate::error::SignalError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// One signal observation: the eigen-gap index at an end-time.
///
/// `signal` is `None` when the window ending at `time` was incomplete; the
/// value is undefined there and stays undefined through persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalRow {
    pub time: i64,
    pub signal: Option<u32>,
}

/// Chronologically ordered, append-only sequence of signal rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignalSeries {
    pub rows: Vec<SignalRow>,
}

impl SignalSeries {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Time of the most recent row
    pub fn last_time(&self) -> Option<i64> {
        self.rows.last().map(|row| row.time)
    }
}

/// Signal computation engine and series manager.
///
/// Orchestrates window extraction, spectral extraction and persistence over
/// a sequence of end-times. Per call it takes exactly one of three paths:
/// a fresh build when nothing is stored, a no-op when the stored series
/// already reaches the last complete period, or an incremental update that
/// appends only the newly elapsed periods.
///
/// Assumes a single writer per stored series: concurrent calls against the
/// same prefix are not synchronized here.
#[derive(Debug)]
pub struct Signals {
    config: SignalConfig,
    store: SignalStore,
}

impl Signals {
    pub fn new(config: SignalConfig) -> Self {
        let store = SignalStore::new(&config.data_path);
        Self { config, store }
    }

    /// Compute or extend the signal series for a price table.
    ///
    /// Single consumer entry point: branches on store existence, never on a
    /// not-found error.
    pub fn compute(
        &self,
        prefix: &str,
        table: &PriceTable,
        interval: Interval,
    ) -> Result<SignalSeries> {
        if self.store.exists(prefix, interval) {
            self.update(prefix, table, interval)
        } else {
            info!("market signals are getting computed");
            let series = self.fresh_build(prefix, table, interval)?;
            info!("computation completed");
            Ok(series)
        }
    }

    /// Extend an existing stored series up to the last complete period.
    ///
    /// The price table is trimmed to the history the new windows can reach
    /// before any computation; rows strictly after the stored end are
    /// appended, existing rows are never rewritten.
    pub fn update(
        &self,
        prefix: &str,
        table: &PriceTable,
        interval: Interval,
    ) -> Result<SignalSeries> {
        let stored = self.store.load(prefix, interval)?;
        let Some(since) = stored.last_time() else {
            // A headers-only file has no last row to extend from; rebuild.
            return self.fresh_build(prefix, table, interval);
        };

        let boundary = last_complete_period(interval);
        if since < boundary {
            info!("signal data is getting updated");
            let step = interval.seconds();
            let cutoff = since - (self.config.window_len() as i64) * step;
            let trimmed = table.after(cutoff);

            let mut times = Vec::new();
            let mut t = since + step;
            while t <= boundary {
                times.push(t);
                t += step;
            }

            let rows = self
                .compute_rows(&trimmed, &times, interval)
                .context("signal update aborted, stored series left unchanged")?;
            self.store.append_rows(prefix, interval, &rows)?;
            info!("update complete");
        } else {
            info!("signal data is up to date");
        }

        Ok(self.store.load(prefix, interval)?)
    }

    /// Signal value for the window ending at `end_time`.
    ///
    /// `Ok(None)` when the window is incomplete; `GapNotFound` when the
    /// smoothed spectrum never drops below the gap threshold.
    pub fn compute_window_signal(
        &self,
        table: &PriceTable,
        end_time: i64,
        interval: Interval,
    ) -> Result<Option<u32>, SignalError> {
        let window = WindowSample::build(
            table,
            end_time,
            interval,
            self.config.corr_win,
            self.config.smth_win,
            &self.config.assets,
        );
        if !window.is_complete() {
            return Ok(None);
        }

        let returns = simple_returns(&window.prices);
        let spectrum = smoothed_spectrum(
            &returns,
            self.config.corr_win,
            self.config.smth_win,
            self.config.dis_thr,
        );
        eigen_gap(&spectrum, self.config.gap_thr).map(Some)
    }

    fn fresh_build(
        &self,
        prefix: &str,
        table: &PriceTable,
        interval: Interval,
    ) -> Result<SignalSeries> {
        let times = table.distinct_times();
        let rows = self
            .compute_rows(table, &times, interval)
            .context("signal build aborted, nothing persisted")?;
        self.store.write_fresh(prefix, interval, &rows)?;
        Ok(SignalSeries { rows })
    }

    /// Compute the rows for a batch of end-times, in order.
    ///
    /// Fails on the first `GapNotFound`, before anything reaches the store:
    /// a batch is persisted entirely or not at all.
    fn compute_rows(
        &self,
        table: &PriceTable,
        times: &[i64],
        interval: Interval,
    ) -> Result<Vec<SignalRow>, SignalError> {
        times
            .iter()
            .map(|&time| {
                Ok(SignalRow {
                    time,
                    signal: self.compute_window_signal(table, time, interval)?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::last_complete_period;
    use crate::data::PricePoint;
    use tempfile::tempdir;

    const HOUR: i64 = 3600;

    /// Closing prices whose time-descending returns equal `desc_returns`,
    /// listed in ascending time order.
    fn ascending_prices(base: f64, desc_returns: &[f64]) -> Vec<f64> {
        let mut prices = vec![base];
        for r in desc_returns.iter().rev() {
            let last = *prices.last().unwrap();
            prices.push(last * (1.0 + r));
        }
        prices
    }

    fn table_from_patterns(
        times: &[i64],
        patterns: &[(&str, f64, Vec<f64>)],
    ) -> PriceTable {
        let mut table = PriceTable::default();
        for (asset, base, desc_returns) in patterns {
            let prices = ascending_prices(*base, desc_returns);
            assert_eq!(prices.len(), times.len());
            for (time, close) in times.iter().zip(prices) {
                table.push(PricePoint {
                    asset: asset.to_string(),
                    time: *time,
                    close,
                });
            }
        }
        table
    }

    fn six_asset_config(data_path: &std::path::Path) -> SignalConfig {
        SignalConfig {
            data_path: data_path.to_path_buf(),
            assets: ["A", "B", "C", "D", "E", "F"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            corr_win: 3,
            smth_win: 2,
            dis_thr: 0.5,
            gap_thr: 0.2,
        }
    }

    /// Two 3-asset blocks with within-block correlation 1 and cross-block
    /// correlation -0.5 in every replicate sub-window.
    fn two_block_table(times: &[i64]) -> PriceTable {
        let x = vec![0.1, -0.1, 0.0, 0.1];
        let y = vec![0.0, 0.1, -0.1, 0.0];
        table_from_patterns(
            times,
            &[
                ("A", 100.0, x.clone()),
                ("B", 200.0, x.clone()),
                ("C", 50.0, x),
                ("D", 30.0, y.clone()),
                ("E", 80.0, y.clone()),
                ("F", 10.0, y),
            ],
        )
    }

    #[test]
    fn test_two_block_universe_signal() {
        let dir = tempdir().unwrap();
        let signals = Signals::new(six_asset_config(dir.path()));
        let times: Vec<i64> = (1..=5).map(|i| i * HOUR).collect();
        let table = two_block_table(&times);

        // Two clusters of perfectly correlated assets: the smoothed
        // spectrum is [3, 3, 0, 0, 0, 0] and the gap sits at index 2.
        let signal = signals
            .compute_window_signal(&table, 5 * HOUR, Interval::Hour)
            .unwrap();
        assert_eq!(signal, Some(2));

        // Deterministic on the same input.
        let again = signals
            .compute_window_signal(&table, 5 * HOUR, Interval::Hour)
            .unwrap();
        assert_eq!(signal, again);
    }

    #[test]
    fn test_incomplete_window_is_undefined() {
        let dir = tempdir().unwrap();
        let signals = Signals::new(six_asset_config(dir.path()));
        // Only 4 of the 5 required timestamps observed.
        let times: Vec<i64> = [1i64, 3, 4, 5].iter().map(|i| i * HOUR).collect();
        let table = two_block_table(&times);

        let signal = signals
            .compute_window_signal(&table, 5 * HOUR, Interval::Hour)
            .unwrap();
        assert_eq!(signal, None);
    }

    #[test]
    fn test_gap_not_found_aborts_before_write() {
        let dir = tempdir().unwrap();
        let config = SignalConfig {
            data_path: dir.path().to_path_buf(),
            assets: ["A", "B", "C"].iter().map(|s| s.to_string()).collect(),
            corr_win: 3,
            smth_win: 1,
            dis_thr: 0.5,
            gap_thr: 0.1,
        };
        let signals = Signals::new(config);

        // Pairwise correlations of -0.5 discretize to the identity matrix,
        // whose spectrum never drops below the gap threshold.
        let times: Vec<i64> = (1..=4).map(|i| i * HOUR).collect();
        let table = table_from_patterns(
            &times,
            &[
                ("A", 100.0, vec![0.1, -0.1, 0.0]),
                ("B", 50.0, vec![0.0, 0.1, -0.1]),
                ("C", 20.0, vec![-0.1, 0.0, 0.1]),
            ],
        );

        let result = signals.compute("digital", &table, Interval::Hour);
        assert!(result.is_err());
        // Nothing was persisted for the failed batch.
        assert!(!SignalStore::new(dir.path()).exists("digital", Interval::Hour));
    }

    fn correlated_universe_config(data_path: &std::path::Path) -> SignalConfig {
        SignalConfig {
            data_path: data_path.to_path_buf(),
            assets: ["A", "B", "C"].iter().map(|s| s.to_string()).collect(),
            corr_win: 2,
            smth_win: 2,
            dis_thr: 0.5,
            gap_thr: 0.1,
        }
    }

    /// All assets share one alternating return pattern, so every window
    /// discretizes to the all-ones matrix and yields signal 1.
    fn correlated_table(times: &[i64]) -> PriceTable {
        let pattern: Vec<f64> = (0..times.len() - 1)
            .map(|i| if i % 2 == 0 { 0.1 } else { -0.05 })
            .collect();
        table_from_patterns(
            times,
            &[
                ("A", 100.0, pattern.clone()),
                ("B", 40.0, pattern.clone()),
                ("C", 7.0, pattern),
            ],
        )
    }

    #[test]
    fn test_fresh_build_then_up_to_date_is_idempotent() {
        let dir = tempdir().unwrap();
        let signals = Signals::new(correlated_universe_config(dir.path()));

        let end = last_complete_period(Interval::Hour);
        let times: Vec<i64> = (0..8).map(|i| end - (7 - i) * HOUR).collect();
        let table = correlated_table(&times);

        let first = signals.compute("digital", &table, Interval::Hour).unwrap();
        assert_eq!(first.len(), 8);
        // Window length is 4: the first 3 end-times are incomplete.
        assert!(first.rows[..3].iter().all(|r| r.signal.is_none()));
        assert!(first.rows[3..].iter().all(|r| r.signal == Some(1)));

        // Times strictly increase on the interval grid.
        for pair in first.rows.windows(2) {
            assert_eq!(pair[1].time - pair[0].time, HOUR);
        }

        // Nothing new to compute: identical series, no rows appended.
        let second = signals.compute("digital", &table, Interval::Hour).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_incremental_update_matches_fresh_build() {
        let dir = tempdir().unwrap();
        let signals = Signals::new(correlated_universe_config(dir.path()));

        let end = last_complete_period(Interval::Hour);
        let times: Vec<i64> = (0..8).map(|i| end - (7 - i) * HOUR).collect();
        let table = correlated_table(&times);

        // One pass over the full history.
        let full = signals.compute("full", &table, Interval::Hour).unwrap();

        // Prefix build, then incremental extension with the full table.
        let prefix_table = table.between(times[0], times[4]);
        signals.compute("inc", &prefix_table, Interval::Hour).unwrap();
        let extended = signals.compute("inc", &table, Interval::Hour).unwrap();

        assert_eq!(full.rows, extended.rows);
    }
}
