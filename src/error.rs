//! Error types for signal computation and storage

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the signal computation pipeline
#[derive(Error, Debug)]
pub enum SignalError {
    /// The eigen-gap scan found no eigenvalue magnitude below the threshold.
    ///
    /// This is a computational failure for the affected end-time: the caller
    /// must not substitute a default index, and any in-progress batch is
    /// abandoned before rows are persisted.
    #[error("no eigenvalue magnitude below gap threshold {threshold}")]
    GapNotFound { threshold: f64 },
}

/// Errors produced by the CSV stores
#[derive(Error, Debug)]
pub enum StorageError {
    /// No stored file exists for the requested series.
    #[error("no stored data at {path}")]
    NotFound { path: PathBuf },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A stored row could not be parsed back into its typed form.
    #[error("malformed row: {0}")]
    Malformed(String),
}
