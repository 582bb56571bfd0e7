//! Volatility bands.

use marketlab_core::error::IndicatorError;

use crate::{ensure_history, ensure_lookback};

/// Aligned Bollinger band columns, each the full series length.
#[derive(Debug, Clone)]
pub struct BollingerOutput {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

/// Bollinger bands: SMA +/- k standard deviations over the trailing window.
///
/// Standard deviation uses population variance so identical inputs always
/// reproduce identical bands.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    lookback: usize,
    k: f64,
}

impl BollingerBands {
    /// Create new bands with width multiplier `k`.
    pub fn new(lookback: usize, k: f64) -> Result<Self, IndicatorError> {
        ensure_lookback(lookback)?;
        if !k.is_finite() || k <= 0.0 {
            return Err(IndicatorError::InvalidParameter(format!(
                "band width multiplier {k} must be a positive real"
            )));
        }
        Ok(Self { lookback, k })
    }

    /// Compute over a close series.
    pub fn compute(&self, closes: &[f64]) -> Result<BollingerOutput, IndicatorError> {
        ensure_history(self.lookback + 1, closes.len())?;

        let lookback_f64 = self.lookback as f64;
        let mut upper = vec![None; closes.len()];
        let mut middle = vec![None; closes.len()];
        let mut lower = vec![None; closes.len()];

        for i in (self.lookback - 1)..closes.len() {
            let window = &closes[i + 1 - self.lookback..=i];
            if !window.iter().all(|v| v.is_finite()) {
                continue;
            }

            let mean = window.iter().sum::<f64>() / lookback_f64;
            let variance =
                window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / lookback_f64;
            let std_dev = variance.sqrt();

            upper[i] = Some(mean + self.k * std_dev);
            middle[i] = Some(mean);
            lower[i] = Some(mean - self.k * std_dev);
        }

        Ok(BollingerOutput {
            upper,
            middle,
            lower,
        })
    }
}
