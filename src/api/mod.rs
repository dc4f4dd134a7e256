//! Kraken API client module
//!
//! Provides functionality to fetch OHLC market data from the Kraken
//! exchange.

mod kraken;
mod types;

pub use kraken::{KrakenClient, KrakenError};
pub use types::*;
