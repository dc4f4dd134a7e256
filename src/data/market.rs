//! Market data acquisition with incremental refresh

use super::price_table::{PricePoint, PriceTable};
use super::storage::MarketStore;
use crate::api::KrakenClient;
use crate::clock::{last_complete_period, Interval};
use crate::config::MarketConfig;
use anyhow::{Context, Result};
use tracing::info;

/// Downloads and maintains the stored price history for the asset universe.
///
/// `get` is the only entry point consumers need: it downloads the full
/// history the first time and falls back to a gap-only update on every later
/// call, keyed on the last complete period of the clock.
#[derive(Debug)]
pub struct MarketData {
    config: MarketConfig,
    client: KrakenClient,
    store: MarketStore,
}

impl MarketData {
    pub fn new(config: MarketConfig) -> Self {
        let client = KrakenClient::new(&config.api_url);
        let store = MarketStore::new(&config.data_path);
        Self {
            config,
            client,
            store,
        }
    }

    /// Stored price table for `(prefix, interval)`, downloading the full
    /// history on first use
    pub fn get(&self, prefix: &str, interval: Interval) -> Result<PriceTable> {
        if self.store.exists(prefix, interval) {
            return self.update(prefix, interval);
        }

        info!("market data is getting downloaded");
        let mut table = PriceTable::default();
        for asset in &self.config.assets {
            table.extend(self.fetch_asset(asset, interval, None)?);
        }
        self.store
            .write_fresh(prefix, interval, &table)
            .context("failed to write downloaded market data")?;
        info!("download complete");

        Ok(table)
    }

    /// Fetch and append only the candles newer than the stored history.
    ///
    /// No-op when the stored table already covers the last complete period.
    pub fn update(&self, prefix: &str, interval: Interval) -> Result<PriceTable> {
        let table = self.store.load(prefix, interval)?;
        let boundary = last_complete_period(interval);

        match table.last_time() {
            Some(since) if since < boundary => {
                info!("market data is getting updated");
                let mut fresh = Vec::new();
                for asset in &self.config.assets {
                    fresh.extend(self.fetch_asset(asset, interval, Some(since))?);
                }
                self.store.append(prefix, interval, &fresh)?;
                info!("update complete");
            }
            _ => info!("market data is up to date"),
        }

        Ok(self.store.load(prefix, interval)?)
    }

    fn fetch_asset(
        &self,
        asset: &str,
        interval: Interval,
        since: Option<i64>,
    ) -> Result<Vec<PricePoint>> {
        let pair = format!("{}{}", asset, self.config.fiat);
        let rows = self
            .client
            .ohlc(&pair, interval, since)
            .with_context(|| format!("failed to fetch candles for {pair}"))?;

        Ok(rows
            .into_iter()
            .map(|row| PricePoint {
                asset: asset.to_string(),
                time: row.time(),
                close: row.close(),
            })
            .collect())
    }
}
