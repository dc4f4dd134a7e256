//! Visualization utilities (text-based for terminal output)

use crate::signal::SignalSeries;
use chrono::{DateTime, Utc};

/// Print a signal series as an ASCII bar chart, one row per end-time.
///
/// Undefined signals render as a dash instead of a bar.
pub fn print_signal_series(series: &SignalSeries, width: usize, title: &str) {
    println!("\n{}", title);
    println!("{}", "=".repeat(title.len()));

    let max_signal = series
        .rows
        .iter()
        .filter_map(|row| row.signal)
        .max()
        .unwrap_or(0)
        .max(1);

    for row in &series.rows {
        let stamp = format_time(row.time);
        match row.signal {
            Some(signal) => {
                let bar_len = (signal as usize * width) / max_signal as usize;
                println!("{} | {:bar_width$} {}", stamp, "#".repeat(bar_len), signal, bar_width = width);
            }
            None => println!("{} | {:bar_width$} -", stamp, "", bar_width = width),
        }
    }

    println!();
    println!(
        "{} rows, max signal {}",
        series.len(),
        max_signal
    );
}

fn format_time(timestamp: i64) -> String {
    match DateTime::<Utc>::from_timestamp(timestamp, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => timestamp.to_string(),
    }
}
