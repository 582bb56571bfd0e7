//! Bar integrity checks and calendar-gap handling.

use marketlab_core::error::ValidationError;
use marketlab_core::types::{Bar, BarSeries, Timeframe};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// What to do when the series is missing one or more nominal intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GapPolicy {
    /// Synthesize bars carrying the last close as O=H=L=C with zero volume.
    #[default]
    ForwardFill,
    /// Leave the gap in place; downstream indicators tolerate the shorter
    /// window at that point.
    MarkAndSkip,
}

/// Validates raw bar records into a [`BarSeries`].
///
/// The input slice is never mutated; a fresh series is produced or a
/// [`ValidationError`] aborts the instrument's pipeline.
#[derive(Debug, Clone)]
pub struct SeriesValidator {
    timeframe: Timeframe,
    gap_policy: GapPolicy,
}

impl SeriesValidator {
    /// Create a validator for the expected nominal interval.
    pub fn new(timeframe: Timeframe, gap_policy: GapPolicy) -> Self {
        Self {
            timeframe,
            gap_policy,
        }
    }

    /// Validate the raw bars and apply the gap policy.
    pub fn validate(&self, symbol: &str, raw: &[Bar]) -> Result<BarSeries, ValidationError> {
        let mut bars: Vec<Bar> = Vec::with_capacity(raw.len());
        let interval = self.timeframe.as_millis();
        let mut gaps_filled = 0usize;
        let mut gaps_skipped = 0usize;

        for (index, bar) in raw.iter().enumerate() {
            if !bar.is_well_formed() {
                return Err(ValidationError::MalformedBar {
                    index,
                    reason: malformed_reason(bar),
                });
            }

            if let Some(prev) = bars.last().copied() {
                if bar.timestamp <= prev.timestamp {
                    return Err(ValidationError::MalformedBar {
                        index,
                        reason: format!(
                            "timestamp {} not after previous {}",
                            bar.timestamp, prev.timestamp
                        ),
                    });
                }

                let gap = bar.timestamp - prev.timestamp;
                if gap > interval && !self.timeframe.tolerates_calendar_gap(gap) {
                    match self.gap_policy {
                        GapPolicy::ForwardFill => {
                            let mut ts = prev.timestamp + interval;
                            while ts < bar.timestamp {
                                bars.push(Bar::new(
                                    ts,
                                    prev.close,
                                    prev.close,
                                    prev.close,
                                    prev.close,
                                    0.0,
                                ));
                                gaps_filled += 1;
                                ts += interval;
                            }
                        }
                        GapPolicy::MarkAndSkip => {
                            gaps_skipped += 1;
                        }
                    }
                }
            }

            bars.push(*bar);
        }

        if gaps_filled > 0 {
            debug!(symbol, gaps_filled, "forward-filled missing intervals");
        }
        if gaps_skipped > 0 {
            warn!(symbol, gaps_skipped, "series has unfilled calendar gaps");
        }

        Ok(BarSeries::new(symbol, self.timeframe, bars))
    }
}

fn malformed_reason(bar: &Bar) -> String {
    let fields = [bar.open, bar.high, bar.low, bar.close, bar.volume];
    if fields.iter().any(|v| !v.is_finite()) {
        return "non-finite field".to_string();
    }
    if bar.volume < 0.0 {
        return format!("negative volume {}", bar.volume);
    }
    if bar.low < 0.0 {
        return format!("negative low {}", bar.low);
    }
    format!(
        "OHLC ordering violated (o={} h={} l={} c={})",
        bar.open, bar.high, bar.low, bar.close
    )
}

/// Strip leading zero-volume bars left over from incomplete history at the
/// head of a download.
pub fn drop_incomplete(raw: &[Bar]) -> &[Bar] {
    let first_complete = raw.iter().position(|b| b.volume > 0.0).unwrap_or(raw.len());
    &raw[first_complete..]
}
