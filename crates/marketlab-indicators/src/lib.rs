//! Technical indicators over validated bar series.
//!
//! Every indicator returns a series of the same length as its input, with
//! `None` ("not yet available") for positions lacking lookback history.
//! Markers and non-finite inputs invalidate only the windows that include
//! them; recursive indicators re-seed after an invalid run.
//!
//! [`IndicatorSpec`] is the closed set of indicator kinds the engine knows;
//! it maps a validated series to named [`IndicatorFrame`] columns and lets
//! the signal blender match exhaustively on what it consumes.

pub mod momentum;
pub mod moving_average;
pub mod volatility;

pub use momentum::{Macd, MacdOutput, Rsi};
pub use moving_average::{Ema, Sma};
pub use volatility::{BollingerBands, BollingerOutput};

use marketlab_core::error::{EngineResult, IndicatorError};
use marketlab_core::types::{BarSeries, IndicatorFrame};
use serde::{Deserialize, Serialize};

/// Closed set of indicator kinds with a uniform
/// `(series, parameters) -> frame` signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IndicatorSpec {
    Sma { lookback: usize },
    Ema { lookback: usize },
    Rsi { lookback: usize },
    Macd { fast: usize, slow: usize, signal: usize },
    Bollinger { lookback: usize, k: f64 },
}

impl IndicatorSpec {
    /// Column names this spec contributes to the frame.
    pub fn column_names(&self) -> Vec<String> {
        match self {
            IndicatorSpec::Sma { lookback } => vec![format!("sma_{lookback}")],
            IndicatorSpec::Ema { lookback } => vec![format!("ema_{lookback}")],
            IndicatorSpec::Rsi { lookback } => vec![format!("rsi_{lookback}")],
            IndicatorSpec::Macd { .. } => vec![
                "macd".to_string(),
                "macd_signal".to_string(),
                "macd_hist".to_string(),
            ],
            IndicatorSpec::Bollinger { .. } => vec![
                "bb_upper".to_string(),
                "bb_middle".to_string(),
                "bb_lower".to_string(),
            ],
        }
    }

    /// Compute this indicator over a validated series.
    pub fn compute(&self, series: &BarSeries) -> EngineResult<IndicatorFrame> {
        let closes = series.closes();
        let mut frame = IndicatorFrame::new(series.len());

        match *self {
            IndicatorSpec::Sma { lookback } => {
                let values = Sma::new(lookback)?.compute(&closes)?;
                frame.insert(format!("sma_{lookback}"), values)?;
            }
            IndicatorSpec::Ema { lookback } => {
                let values = Ema::new(lookback)?.compute(&closes)?;
                frame.insert(format!("ema_{lookback}"), values)?;
            }
            IndicatorSpec::Rsi { lookback } => {
                let values = Rsi::new(lookback)?.compute(&closes)?;
                frame.insert(format!("rsi_{lookback}"), values)?;
            }
            IndicatorSpec::Macd { fast, slow, signal } => {
                let output = Macd::new(fast, slow, signal)?.compute(&closes)?;
                frame.insert("macd", output.macd)?;
                frame.insert("macd_signal", output.signal)?;
                frame.insert("macd_hist", output.histogram)?;
            }
            IndicatorSpec::Bollinger { lookback, k } => {
                let output = BollingerBands::new(lookback, k)?.compute(&closes)?;
                frame.insert("bb_upper", output.upper)?;
                frame.insert("bb_middle", output.middle)?;
                frame.insert("bb_lower", output.lower)?;
            }
        }

        Ok(frame)
    }
}

/// Compute a set of specs into one frame aligned to the series.
pub fn compute_frame(series: &BarSeries, specs: &[IndicatorSpec]) -> EngineResult<IndicatorFrame> {
    let mut frame = IndicatorFrame::new(series.len());
    for spec in specs {
        frame.merge(spec.compute(series)?)?;
    }
    Ok(frame)
}

pub(crate) fn ensure_lookback(lookback: usize) -> Result<(), IndicatorError> {
    if lookback == 0 {
        return Err(IndicatorError::InvalidParameter(
            "lookback must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn ensure_history(required: usize, available: usize) -> Result<(), IndicatorError> {
    if available < required {
        return Err(IndicatorError::InsufficientData {
            required,
            available,
        });
    }
    Ok(())
}

/// EMA with multiplier `2 / (lookback + 1)` over a masked series, seeded by
/// the simple average of the first `lookback` valid values of each run.
/// Shared by [`Ema`] and the MACD signal line.
pub(crate) fn ema_masked(values: &[Option<f64>], lookback: usize) -> Vec<Option<f64>> {
    let multiplier = 2.0 / (lookback as f64 + 1.0);
    let mut out = vec![None; values.len()];

    let mut ema: Option<f64> = None;
    let mut seed_sum = 0.0;
    let mut seed_count = 0usize;

    for (i, value) in values.iter().enumerate() {
        let value = match value {
            Some(v) if v.is_finite() => *v,
            _ => {
                // Invalid input ends the run; re-seed from the next value
                ema = None;
                seed_sum = 0.0;
                seed_count = 0;
                continue;
            }
        };

        match ema {
            Some(prev) => {
                let next = value * multiplier + prev * (1.0 - multiplier);
                ema = Some(next);
                out[i] = Some(next);
            }
            None => {
                seed_sum += value;
                seed_count += 1;
                if seed_count == lookback {
                    let sma = seed_sum / lookback as f64;
                    ema = Some(sma);
                    out[i] = Some(sma);
                }
            }
        }
    }

    out
}
