//! Eigengap Crypto - Main entry point
//!
//! CLI for maintaining a market structure signal series: fetch OHLC data
//! from Kraken, compute or incrementally extend the eigen-gap signal, and
//! render the stored series in the terminal.

use anyhow::Result;
use clap::{Parser, Subcommand};
use eigengap_crypto::{
    signal::SignalStore,
    utils::print_signal_series,
    Interval, MarketConfig, MarketData, SignalConfig, Signals,
};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "eigengap-crypto")]
#[command(about = "Market structure signal from rolling correlation spectra", long_about = None)]
struct Cli {
    /// Directory for stored market data and signal series
    #[arg(long, default_value = "./data/market")]
    data_dir: String,

    /// Sampling interval (hour or day)
    #[arg(long, default_value = "day")]
    interval: Interval,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download or refresh the stored price history
    Fetch {
        /// File prefix for the stored price table
        #[arg(short, long, default_value = "digital")]
        prefix: String,
    },

    /// Compute or incrementally extend the signal series
    Compute {
        /// File prefix for stored data
        #[arg(short, long, default_value = "digital")]
        prefix: String,
    },

    /// Render a stored signal series as a text chart
    Show {
        /// File prefix for stored data
        #[arg(short, long, default_value = "digital")]
        prefix: String,

        /// Bar width of the chart
        #[arg(short, long, default_value = "40")]
        width: usize,
    },
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch { prefix } => fetch(&cli.data_dir, &prefix, cli.interval),
        Commands::Compute { prefix } => compute(&cli.data_dir, &prefix, cli.interval),
        Commands::Show { prefix, width } => show(&cli.data_dir, &prefix, cli.interval, width),
    }
}

fn fetch(data_dir: &str, prefix: &str, interval: Interval) -> Result<()> {
    let config = MarketConfig {
        data_path: data_dir.into(),
        ..MarketConfig::default()
    };
    let market = MarketData::new(config);

    let table = market.get(prefix, interval)?;
    println!(
        "{} observations across {} timestamps",
        table.len(),
        table.distinct_times().len()
    );

    Ok(())
}

fn compute(data_dir: &str, prefix: &str, interval: Interval) -> Result<()> {
    let market_config = MarketConfig {
        data_path: data_dir.into(),
        ..MarketConfig::default()
    };
    let signal_config = SignalConfig {
        data_path: data_dir.into(),
        ..SignalConfig::default()
    };

    let market = MarketData::new(market_config);
    let table = market.get(prefix, interval)?;

    let signals = Signals::new(signal_config);
    let series = signals.compute(&format!("{prefix}_signal"), &table, interval)?;

    println!("{} signal rows", series.len());
    if let Some(last) = series.rows.last() {
        match last.signal {
            Some(signal) => println!("latest signal: {}", signal),
            None => println!("latest signal: undefined (incomplete window)"),
        }
    }

    Ok(())
}

fn show(data_dir: &str, prefix: &str, interval: Interval, width: usize) -> Result<()> {
    let store = SignalStore::new(data_dir);
    let series = store.load(&format!("{prefix}_signal"), interval)?;
    print_signal_series(&series, width, &format!("{prefix} market structure ({interval})"));
    Ok(())
}
