//! Kraken API client implementation

use super::types::{KrakenResponse, OhlcRow};
use crate::clock::Interval;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when querying the Kraken API
#[derive(Error, Debug)]
pub enum KrakenError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("kraken api error: {0}")]
    Api(String),

    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// Kraken public API client for fetching OHLC market data
#[derive(Debug, Clone)]
pub struct KrakenClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl KrakenClient {
    /// Create a client against the given base URL
    ///
    /// Taking the URL as a parameter keeps the client pointable at a local
    /// stub in tests.
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch OHLC candles for one pair.
    ///
    /// With `since`, only candles after that timestamp are returned. The
    /// final row of every Kraken OHLC response is the still-forming current
    /// candle and is dropped, so callers only ever see fully elapsed
    /// periods.
    pub fn ohlc(
        &self,
        pair: &str,
        interval: Interval,
        since: Option<i64>,
    ) -> Result<Vec<OhlcRow>, KrakenError> {
        let mut url = format!(
            "{}/0/public/OHLC?pair={}&interval={}",
            self.base_url,
            pair,
            interval.minutes()
        );
        if let Some(since) = since {
            url.push_str(&format!("&since={}", since));
        }

        let response: KrakenResponse = self.client.get(&url).send()?.json()?;

        if !response.error.is_empty() {
            return Err(KrakenError::Api(response.error.join("; ")));
        }

        let result = response
            .result
            .ok_or_else(|| KrakenError::Malformed("no result in response".to_string()))?;
        let mut rows = result
            .into_rows()
            .ok_or_else(|| KrakenError::Malformed(format!("no candle data for {pair}")))?;

        // Drop the in-progress candle.
        rows.pop();

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore] // Requires network access
    fn test_ohlc_fetch() {
        let client = KrakenClient::new(crate::config::KRAKEN_API_URL);
        let rows = client.ohlc("BTCUSD", Interval::Hour, None).unwrap();
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|r| r.close() > 0.0));
    }

    #[test]
    #[ignore]
    fn test_ohlc_since() {
        let client = KrakenClient::new(crate::config::KRAKEN_API_URL);
        let since = chrono::Utc::now().timestamp() - 6 * 3600;
        let rows = client.ohlc("ETHUSD", Interval::Hour, Some(since)).unwrap();
        assert!(rows.iter().all(|r| r.time() > since));
    }
}
