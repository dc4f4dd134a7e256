//! Sampling intervals and period alignment

use chrono::Utc;
use std::fmt;
use std::str::FromStr;

/// Sampling granularity for price candles and signal steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interval {
    /// 1 hour
    Hour,
    /// 1 day
    Day,
}

impl Interval {
    /// Interval length in minutes (the unit the Kraken API expects)
    pub fn minutes(&self) -> i64 {
        match self {
            Interval::Hour => 60,
            Interval::Day => 1440,
        }
    }

    /// Interval length in seconds (the unit of all timestamps in the system)
    pub fn seconds(&self) -> i64 {
        self.minutes() * 60
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interval::Hour => write!(f, "hour"),
            Interval::Day => write!(f, "day"),
        }
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hour" | "60" => Ok(Interval::Hour),
            "day" | "1440" => Ok(Interval::Day),
            other => Err(format!("unknown interval '{other}' (expected 'hour' or 'day')")),
        }
    }
}

/// Truncate a Unix timestamp down to the start of its period.
///
/// Hourly periods start at the top of the hour, daily periods at midnight
/// UTC; both boundaries coincide with the epoch grid.
pub fn period_start(timestamp: i64, interval: Interval) -> i64 {
    timestamp - timestamp.rem_euclid(interval.seconds())
}

/// End timestamp of the most recently fully elapsed period.
///
/// The current (still forming) period is never returned: the start of the
/// period containing "now" is pushed back by one interval length.
pub fn last_complete_period(interval: Interval) -> i64 {
    period_start(Utc::now().timestamp(), interval) - interval.seconds()
}
