//! Timeframe definitions for market data.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Nominal sampling interval of a bar series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    /// 1 minute bars
    #[serde(rename = "1m")]
    Minute1,
    /// 5 minute bars
    #[serde(rename = "5m")]
    Minute5,
    /// 15 minute bars
    #[serde(rename = "15m")]
    Minute15,
    /// 1 hour bars
    #[serde(rename = "1h")]
    Hour1,
    /// Daily bars
    #[serde(rename = "1d")]
    #[default]
    Daily,
    /// Weekly bars
    #[serde(rename = "1w")]
    Weekly,
}

impl Timeframe {
    /// Duration of the nominal interval in milliseconds.
    pub fn as_millis(&self) -> i64 {
        match self {
            Timeframe::Minute1 => 60_000,
            Timeframe::Minute5 => 300_000,
            Timeframe::Minute15 => 900_000,
            Timeframe::Hour1 => 3_600_000,
            Timeframe::Daily => 86_400_000,
            Timeframe::Weekly => 604_800_000,
        }
    }

    /// Bars per year at this frequency, used to annualize return metrics.
    ///
    /// Intraday counts assume a 6.5 hour session over 252 trading days.
    pub fn periods_per_year(&self) -> f64 {
        match self {
            Timeframe::Minute1 => 252.0 * 390.0,
            Timeframe::Minute5 => 252.0 * 78.0,
            Timeframe::Minute15 => 252.0 * 26.0,
            Timeframe::Hour1 => 252.0 * 6.5,
            Timeframe::Daily => 252.0,
            Timeframe::Weekly => 52.0,
        }
    }

    /// Whether a gap between two consecutive timestamps spans a non-trading
    /// period rather than missing data. Daily and weekly series legitimately
    /// skip weekends; intraday gap handling is left to the gap policy.
    pub fn tolerates_calendar_gap(&self, gap_millis: i64) -> bool {
        match self {
            // Fri -> Mon is a 3-day gap on a daily series
            Timeframe::Daily => gap_millis <= 3 * self.as_millis(),
            Timeframe::Weekly => gap_millis <= self.as_millis(),
            _ => false,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Timeframe::Minute1 => "1m",
            Timeframe::Minute5 => "5m",
            Timeframe::Minute15 => "15m",
            Timeframe::Hour1 => "1h",
            Timeframe::Daily => "1d",
            Timeframe::Weekly => "1w",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1m" | "1min" | "minute" => Ok(Timeframe::Minute1),
            "5m" | "5min" => Ok(Timeframe::Minute5),
            "15m" | "15min" => Ok(Timeframe::Minute15),
            "1h" | "1hour" | "hour" => Ok(Timeframe::Hour1),
            "1d" | "day" | "daily" => Ok(Timeframe::Daily),
            "1w" | "week" | "weekly" => Ok(Timeframe::Weekly),
            _ => Err(format!("Invalid timeframe: {}", s)),
        }
    }
}
