//! Rolling window extraction from the price table

use crate::clock::Interval;
use crate::data::PriceTable;
use ndarray::Array2;
use std::collections::HashMap;

/// Price observations needed to evaluate one signal value.
///
/// Holds the distinct observation times inside the window, most recent
/// first, and a price matrix with one row per time and one column per asset
/// of the configured universe. Assets with no observation at a time carry
/// NaN in that cell.
#[derive(Debug, Clone)]
pub struct WindowSample {
    /// Distinct observation times, descending
    pub times: Vec<i64>,
    /// Price matrix, row i corresponds to `times[i]`
    pub prices: Array2<f64>,
    expected_len: usize,
}

impl WindowSample {
    /// Extract the window ending at `end_time`.
    ///
    /// The window spans `corr_win + smth_win` period-aligned timestamps:
    /// `[end_time - (corr_win + smth_win - 1) * step, end_time]`. Only times
    /// actually observed in the table appear in the sample; completeness is
    /// checked separately via [`is_complete`](Self::is_complete).
    pub fn build(
        table: &PriceTable,
        end_time: i64,
        interval: Interval,
        corr_win: usize,
        smth_win: usize,
        assets: &[String],
    ) -> Self {
        let expected_len = corr_win + smth_win;
        let start_time = end_time - (expected_len as i64 - 1) * interval.seconds();

        // Group in-range observations by time.
        let mut by_time: HashMap<i64, HashMap<&str, f64>> = HashMap::new();
        for point in table.points() {
            if point.time >= start_time && point.time <= end_time {
                by_time
                    .entry(point.time)
                    .or_default()
                    .insert(point.asset.as_str(), point.close);
            }
        }

        let mut times: Vec<i64> = by_time.keys().copied().collect();
        times.sort_unstable_by(|a, b| b.cmp(a));

        let mut prices = Array2::from_elem((times.len(), assets.len()), f64::NAN);
        for (i, time) in times.iter().enumerate() {
            let row = &by_time[time];
            for (j, asset) in assets.iter().enumerate() {
                if let Some(&close) = row.get(asset.as_str()) {
                    prices[[i, j]] = close;
                }
            }
        }

        Self {
            times,
            prices,
            expected_len,
        }
    }

    /// Whether every timestamp of the window was observed.
    ///
    /// A signal value is only defined for complete windows; incomplete ones
    /// must yield an undefined signal, never a default.
    pub fn is_complete(&self) -> bool {
        self.times.len() == self.expected_len
    }
}
