//! Spectral extraction: correlation, discretization, eigen-gap
//!
//! A block-like correlation structure concentrates spectral mass in a few
//! large eigenvalues of the discretized matrix; the index where the
//! magnitude-sorted spectrum drops below the gap threshold approximates the
//! number of dominant correlated clusters.

use crate::error::SignalError;
use nalgebra::{DMatrix, SymmetricEigen};
use ndarray::{Array2, ArrayView2};

/// Pearson correlation matrix over a return sub-window.
///
/// Columns are assets, rows are periods. A zero-variance column yields NaN
/// in its row and column (including the diagonal), exactly as the division
/// leaves them; those entries are cleaned up by [`discretize`], not here.
pub fn correlation_matrix(window: ArrayView2<f64>) -> Array2<f64> {
    let n_rows = window.nrows();
    let n_assets = window.ncols();

    let means: Vec<f64> = (0..n_assets)
        .map(|j| window.column(j).sum() / n_rows as f64)
        .collect();

    // Centered cross products.
    let mut cross = Array2::zeros((n_assets, n_assets));
    for i in 0..n_assets {
        for j in i..n_assets {
            let mut sum = 0.0;
            for t in 0..n_rows {
                sum += (window[[t, i]] - means[i]) * (window[[t, j]] - means[j]);
            }
            cross[[i, j]] = sum;
            cross[[j, i]] = sum;
        }
    }

    let mut corr = Array2::zeros((n_assets, n_assets));
    for i in 0..n_assets {
        for j in 0..n_assets {
            corr[[i, j]] = cross[[i, j]] / (cross[[i, i]] * cross[[j, j]]).sqrt();
        }
    }

    corr
}

/// Binarize a correlation matrix against a threshold.
///
/// Entries at or above the threshold map to 1, everything else (including
/// NaN entries from degenerate correlations) maps to 0. Returns a new
/// matrix; the input is left untouched.
pub fn discretize(matrix: &Array2<f64>, threshold: f64) -> Array2<f64> {
    matrix.mapv(|v| {
        if v.is_nan() {
            0.0
        } else if v < threshold {
            0.0
        } else {
            1.0
        }
    })
}

/// Real eigenvalues of a symmetric matrix, sorted by descending magnitude
pub fn eigen_spectrum(matrix: &Array2<f64>) -> Vec<f64> {
    let n = matrix.nrows();
    let sym = DMatrix::from_fn(n, n, |i, j| matrix[[i, j]]);
    let eigen = SymmetricEigen::new(sym);

    let mut values: Vec<f64> = eigen.eigenvalues.iter().copied().collect();
    values.sort_by(|a, b| {
        b.abs()
            .partial_cmp(&a.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    values
}

/// Mean spectrum over `smth_win` overlapping correlation sub-windows.
///
/// Replicate i covers rows `[i, i + corr_win)` of the return matrix. The
/// spectra are averaged position by position after magnitude sorting, i.e.
/// aligned by rank rather than by eigenvector identity; this dampens
/// sensitivity to the exact sub-window boundary.
pub fn smoothed_spectrum(
    returns: &Array2<f64>,
    corr_win: usize,
    smth_win: usize,
    dis_thr: f64,
) -> Vec<f64> {
    let n_assets = returns.ncols();
    let mut mean = vec![0.0; n_assets];

    for i in 0..smth_win {
        let sub = returns.slice(ndarray::s![i..i + corr_win, ..]);
        let corr = correlation_matrix(sub);
        let dis = discretize(&corr, dis_thr);
        let spectrum = eigen_spectrum(&dis);
        for (acc, value) in mean.iter_mut().zip(spectrum) {
            *acc += value;
        }
    }

    for acc in mean.iter_mut() {
        *acc /= smth_win as f64;
    }
    mean
}

/// Index of the first eigenvalue whose magnitude falls below the threshold.
///
/// Scans from index 0 of the magnitude-sorted spectrum. When every
/// eigenvalue stays at or above the threshold there is no gap to report and
/// the computation fails; the caller must not fall back to a default index.
pub fn eigen_gap(spectrum: &[f64], threshold: f64) -> Result<u32, SignalError> {
    spectrum
        .iter()
        .position(|v| v.abs() < threshold)
        .map(|idx| idx as u32)
        .ok_or(SignalError::GapNotFound { threshold })
}
