//! Type definitions for Kraken public API responses

use serde::Deserialize;
use std::collections::HashMap;

/// Kraken API response wrapper
///
/// Kraken reports failures as a non-empty `error` array; `result` may be
/// absent in that case.
#[derive(Debug, Clone, Deserialize)]
pub struct KrakenResponse {
    pub error: Vec<String>,
    #[serde(default)]
    pub result: Option<OhlcResult>,
}

/// OHLC query result
///
/// The candle list lives under a dynamic key (the exchange's internal pair
/// name, e.g. `XXBTZUSD` for `BTCUSD`), next to a `last` cursor usable as
/// the `since` parameter of a follow-up request.
#[derive(Debug, Clone, Deserialize)]
pub struct OhlcResult {
    pub last: i64,
    #[serde(flatten)]
    pub pairs: HashMap<String, Vec<OhlcRow>>,
}

impl OhlcResult {
    /// Candle rows of the single requested pair, whatever Kraken named it
    pub fn into_rows(self) -> Option<Vec<OhlcRow>> {
        self.pairs.into_values().next()
    }
}

/// Individual OHLC candle
/// Format: [time, open, high, low, close, vwap, volume, count]
#[derive(Debug, Clone, Deserialize)]
pub struct OhlcRow(
    pub i64,    // period start time (unix seconds)
    pub String, // open
    pub String, // high
    pub String, // low
    pub String, // close
    pub String, // vwap
    pub String, // volume
    pub i64,    // trade count
);

impl OhlcRow {
    pub fn time(&self) -> i64 {
        self.0
    }

    pub fn open(&self) -> f64 {
        self.1.parse().unwrap_or(0.0)
    }

    pub fn high(&self) -> f64 {
        self.2.parse().unwrap_or(0.0)
    }

    pub fn low(&self) -> f64 {
        self.3.parse().unwrap_or(0.0)
    }

    pub fn close(&self) -> f64 {
        self.4.parse().unwrap_or(0.0)
    }

    pub fn vwap(&self) -> f64 {
        self.5.parse().unwrap_or(0.0)
    }

    pub fn volume(&self) -> f64 {
        self.6.parse().unwrap_or(0.0)
    }

    pub fn count(&self) -> i64 {
        self.7
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "error": [],
        "result": {
            "XXBTZUSD": [
                [1688671200, "30306.1", "30306.2", "30305.7", "30305.7", "30306.1", "3.39243896", 23],
                [1688674800, "30305.7", "30310.0", "30300.1", "30308.2", "30306.0", "1.12000000", 11]
            ],
            "last": 1688671200
        }
    }"#;

    #[test]
    fn test_parse_ohlc_response() {
        let response: KrakenResponse = serde_json::from_str(SAMPLE).unwrap();
        assert!(response.error.is_empty());

        let result = response.result.unwrap();
        assert_eq!(result.last, 1688671200);

        let rows = result.into_rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].time(), 1688671200);
        assert!((rows[0].close() - 30305.7).abs() < 1e-9);
        assert!((rows[1].vwap() - 30306.0).abs() < 1e-9);
        assert_eq!(rows[0].count(), 23);
    }

    #[test]
    fn test_parse_error_response() {
        let payload = r#"{"error": ["EQuery:Unknown asset pair"]}"#;
        let response: KrakenResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(response.error.len(), 1);
        assert!(response.result.is_none());
    }
}
