//! Configuration for market data acquisition and signal computation
//!
//! All parameters are injected at construction; nothing is read from
//! process-wide mutable state, so several differently configured pipelines
//! can coexist in one process (and in tests).

use std::path::PathBuf;

/// Default directory for stored market data and signal series
pub const DEFAULT_DATA_PATH: &str = "./data/market";

/// Quote currency appended to every asset symbol when querying the exchange
pub const DEFAULT_FIAT: &str = "USD";

/// Kraken public OHLC endpoint
pub const KRAKEN_API_URL: &str = "https://api.kraken.com";

/// Number of periods in each correlation sub-window
pub const DEFAULT_CORRELATION_WINDOW: usize = 10;

/// Number of overlapping sub-window spectra averaged per signal value
pub const DEFAULT_SMOOTHING_WINDOW: usize = 4;

/// Correlation magnitude at or above which a pair counts as connected
pub const DEFAULT_DISCRETIZATION_THRESHOLD: f64 = 0.5;

/// Eigenvalue magnitude below which the spectrum counts as negligible
pub const DEFAULT_GAP_THRESHOLD: f64 = 0.1;

/// Default digital asset universe, ordered by market capitalization.
///
/// The order is significant: it fixes the row/column index of every asset in
/// all correlation matrices, so reordering the universe invalidates stored
/// series.
pub fn default_digital_assets() -> Vec<String> {
    [
        "BTC", "ETH", "USDT", "XRP", "SOL", "USDC", "ADA", "AVAX", "DOGE", "DOT",
        "TRX", "LINK", "MATIC", "WBTC", "SHIB", "LTC", "DAI", "ICP", "UNI", "BCH",
        "XLM", "ATOM", "XMR", "ETC", "FIL", "IMX", "APT", "INJ", "TUSD", "NEAR",
        "OP", "TIA", "LDO", "RUNE", "QNT", "EGLD", "ALGO", "AAVE", "GRT",
        "STX", "ARB", "SNX", "MKR", "BTT", "FLOW", "FTM", "SAND", "LUNA", "AXS",
        "MANA", "GALA", "EOS", "XTZ", "KAVA", "DYDX", "MINA", "WOO", "FET", "FXS",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Parameters of the signal computation pipeline
#[derive(Debug, Clone)]
pub struct SignalConfig {
    /// Directory holding stored signal series
    pub data_path: PathBuf,
    /// Ordered asset universe
    pub assets: Vec<String>,
    /// Correlation sub-window length (periods)
    pub corr_win: usize,
    /// Smoothing replicate count
    pub smth_win: usize,
    /// Discretization threshold in [0, 1]
    pub dis_thr: f64,
    /// Eigen-gap threshold in [0, 1]
    pub gap_thr: f64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            assets: default_digital_assets(),
            corr_win: DEFAULT_CORRELATION_WINDOW,
            smth_win: DEFAULT_SMOOTHING_WINDOW,
            dis_thr: DEFAULT_DISCRETIZATION_THRESHOLD,
            gap_thr: DEFAULT_GAP_THRESHOLD,
        }
    }
}

impl SignalConfig {
    /// Number of distinct observed timestamps a complete window requires
    pub fn window_len(&self) -> usize {
        self.corr_win + self.smth_win
    }
}

/// Parameters of the market data acquisition layer
#[derive(Debug, Clone)]
pub struct MarketConfig {
    /// Directory holding stored price tables
    pub data_path: PathBuf,
    /// Quote currency for exchange pairs
    pub fiat: String,
    /// Ordered asset universe
    pub assets: Vec<String>,
    /// Exchange API base URL
    pub api_url: String,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            fiat: DEFAULT_FIAT.to_string(),
            assets: default_digital_assets(),
            api_url: KRAKEN_API_URL.to_string(),
        }
    }
}
