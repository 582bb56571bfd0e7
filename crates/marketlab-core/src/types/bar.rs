//! OHLCV (Open, High, Low, Close, Volume) data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Timeframe;

/// One OHLCV bar. Uses f64 for fast indicator calculations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Get the timestamp as a DateTime.
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp)
            .unwrap_or_else(|| DateTime::from_timestamp(0, 0).unwrap())
    }

    /// True when every price field respects the OHLC ordering and all
    /// numeric fields are finite and non-negative where required.
    pub fn is_well_formed(&self) -> bool {
        let finite = [self.open, self.high, self.low, self.close, self.volume]
            .iter()
            .all(|v| v.is_finite());

        finite
            && self.low >= 0.0
            && self.volume >= 0.0
            && self.high >= self.open.max(self.close)
            && self.low <= self.open.min(self.close)
    }
}

/// Time-series of bars for one instrument over one timeframe.
///
/// Construction goes through the series validator; once built, the series
/// is read-only for every downstream stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    /// Symbol identifier
    pub symbol: String,
    /// Timeframe of the bars
    pub timeframe: Timeframe,
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Create a series from already ordered bars.
    pub fn new(symbol: impl Into<String>, timeframe: Timeframe, bars: Vec<Bar>) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
            bars,
        }
    }

    /// Get the number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get a bar by index (0 = oldest).
    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    /// Get the last bar.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Get all bars as a slice.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Extract close prices as a vector.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Extract timestamps as a vector.
    pub fn timestamps(&self) -> Vec<i64> {
        self.bars.iter().map(|b| b.timestamp).collect()
    }

    /// Get an iterator over the bars.
    pub fn iter(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter()
    }

    /// A copy of the series truncated to its first `n` bars.
    pub fn truncated(&self, n: usize) -> Self {
        Self {
            symbol: self.symbol.clone(),
            timeframe: self.timeframe,
            bars: self.bars[..n.min(self.bars.len())].to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_bar() {
        let bar = Bar::new(1000, 100.0, 110.0, 95.0, 105.0, 1000.0);
        assert!(bar.is_well_formed());
    }

    #[test]
    fn test_malformed_bars() {
        // high below close
        assert!(!Bar::new(0, 100.0, 101.0, 95.0, 102.0, 1.0).is_well_formed());
        // low above open
        assert!(!Bar::new(0, 100.0, 110.0, 101.0, 105.0, 1.0).is_well_formed());
        // negative volume
        assert!(!Bar::new(0, 100.0, 110.0, 95.0, 105.0, -1.0).is_well_formed());
        // NaN close
        assert!(!Bar::new(0, 100.0, 110.0, 95.0, f64::NAN, 1.0).is_well_formed());
    }

    #[test]
    fn test_series_extractions() {
        let series = BarSeries::new(
            "TEST",
            Timeframe::Daily,
            vec![
                Bar::new(1, 100.0, 101.0, 99.0, 100.5, 1000.0),
                Bar::new(2, 100.5, 102.0, 100.0, 101.5, 2000.0),
            ],
        );

        assert_eq!(series.closes(), vec![100.5, 101.5]);
        assert_eq!(series.timestamps(), vec![1, 2]);
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_truncated() {
        let series = BarSeries::new(
            "TEST",
            Timeframe::Daily,
            (0..5)
                .map(|i| Bar::new(i, 100.0, 101.0, 99.0, 100.0, 1.0))
                .collect(),
        );

        let head = series.truncated(3);
        assert_eq!(head.len(), 3);
        assert_eq!(head.last().unwrap().timestamp, 2);
    }
}
