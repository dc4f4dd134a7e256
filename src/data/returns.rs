//! Simple returns over a time-descending price matrix

use ndarray::Array2;

/// Calculate simple returns from a price matrix whose rows are ordered most
/// recent first.
///
/// Each output row t is `price[t] / price[t+1] - 1`, i.e. the return of the
/// newer period over the one immediately preceding it. Missing prices (NaN)
/// are substituted with 1.0 beforehand, which turns the affected returns
/// into 0 instead of propagating the gap. The output has one row fewer than
/// the input.
pub fn simple_returns(prices: &Array2<f64>) -> Array2<f64> {
    let filled = prices.mapv(|p| if p.is_nan() { 1.0 } else { p });

    let n_rows = filled.nrows();
    let n_cols = filled.ncols();
    let mut returns = Array2::zeros((n_rows.saturating_sub(1), n_cols));

    for t in 0..n_rows.saturating_sub(1) {
        for j in 0..n_cols {
            returns[[t, j]] = filled[[t, j]] / filled[[t + 1, j]] - 1.0;
        }
    }

    returns
}
