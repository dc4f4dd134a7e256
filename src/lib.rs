//! # Eigengap Crypto - Market Structure Signal from Correlation Spectra
//!
//! This library derives a scalar "market structure" signal from a universe
//! of asset price series: rolling windows of returns are turned into
//! discretized correlation matrices, their eigenvalue spectra are smoothed
//! across overlapping sub-windows, and the index where the spectrum drops
//! below a threshold (the eigen-gap) is emitted as the signal — a proxy for
//! the number of independently moving asset clusters.
//!
//! ## Modules
//!
//! - `api` - Kraken API client for fetching OHLC market data
//! - `clock` - Sampling intervals and period alignment
//! - `config` - Pipeline and acquisition configuration
//! - `data` - Price table, returns, persistence and acquisition
//! - `signal` - Window extraction, spectral extraction, series management
//! - `utils` - Terminal output helpers

pub mod api;
pub mod clock;
pub mod config;
pub mod data;
pub mod error;
pub mod signal;
pub mod utils;

pub use api::KrakenClient;
pub use clock::{last_complete_period, Interval};
pub use config::{MarketConfig, SignalConfig};
pub use data::{MarketData, PricePoint, PriceTable};
pub use error::{SignalError, StorageError};
pub use signal::{SignalRow, SignalSeries, Signals};
