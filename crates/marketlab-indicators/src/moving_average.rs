//! Moving average indicators.

use marketlab_core::error::IndicatorError;

use crate::{ema_masked, ensure_history, ensure_lookback};

/// Simple Moving Average (SMA).
///
/// Arithmetic mean of the trailing `lookback` closes. The first
/// `lookback - 1` positions are `None`.
#[derive(Debug, Clone)]
pub struct Sma {
    lookback: usize,
}

impl Sma {
    /// Create a new SMA.
    pub fn new(lookback: usize) -> Result<Self, IndicatorError> {
        ensure_lookback(lookback)?;
        Ok(Self { lookback })
    }

    /// Compute over a close series.
    pub fn compute(&self, closes: &[f64]) -> Result<Vec<Option<f64>>, IndicatorError> {
        ensure_history(self.lookback + 1, closes.len())?;

        let lookback_f64 = self.lookback as f64;
        let mut out = vec![None; closes.len()];

        for i in (self.lookback - 1)..closes.len() {
            let window = &closes[i + 1 - self.lookback..=i];
            if window.iter().all(|v| v.is_finite()) {
                out[i] = Some(window.iter().sum::<f64>() / lookback_f64);
            }
        }

        Ok(out)
    }
}

/// Exponential Moving Average (EMA).
///
/// Recursive smoothing with multiplier `2 / (lookback + 1)`, seeded by the
/// simple average of the first `lookback` closes.
#[derive(Debug, Clone)]
pub struct Ema {
    lookback: usize,
}

impl Ema {
    /// Create a new EMA.
    pub fn new(lookback: usize) -> Result<Self, IndicatorError> {
        ensure_lookback(lookback)?;
        Ok(Self { lookback })
    }

    /// Compute over a close series.
    pub fn compute(&self, closes: &[f64]) -> Result<Vec<Option<f64>>, IndicatorError> {
        ensure_history(self.lookback + 1, closes.len())?;

        let masked: Vec<Option<f64>> = closes
            .iter()
            .map(|&v| v.is_finite().then_some(v))
            .collect();

        Ok(ema_masked(&masked, self.lookback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma_spec_scenario() {
        // 3-period SMA over [10, 11, 12, 11, 10]
        let sma = Sma::new(3).unwrap();
        let out = sma.compute(&[10.0, 11.0, 12.0, 11.0, 10.0]).unwrap();

        assert_eq!(out.len(), 5);
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert!((out[2].unwrap() - 11.0).abs() < 1e-10);
        assert!((out[3].unwrap() - 34.0 / 3.0).abs() < 1e-10);
        assert!((out[4].unwrap() - 11.0).abs() < 1e-10);
    }

    #[test]
    fn test_sma_marker_count() {
        let sma = Sma::new(4).unwrap();
        let data: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        let out = sma.compute(&data).unwrap();

        assert_eq!(out.iter().filter(|v| v.is_none()).count(), 3);
        assert!(out[3].is_some());
    }

    #[test]
    fn test_sma_nan_invalidates_covering_windows_only() {
        let sma = Sma::new(2).unwrap();
        let out = sma
            .compute(&[1.0, 2.0, f64::NAN, 4.0, 5.0])
            .unwrap();

        assert_eq!(out[1], Some(1.5));
        assert_eq!(out[2], None);
        assert_eq!(out[3], None);
        assert_eq!(out[4], Some(4.5));
    }

    #[test]
    fn test_sma_rejects_zero_lookback() {
        assert!(matches!(
            Sma::new(0),
            Err(IndicatorError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_sma_insufficient_history() {
        let sma = Sma::new(5).unwrap();
        let err = sma.compute(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap_err();
        assert!(matches!(
            err,
            IndicatorError::InsufficientData {
                required: 6,
                available: 5
            }
        ));
    }

    #[test]
    fn test_ema_seeded_with_sma() {
        let ema = Ema::new(3).unwrap();
        let out = ema.compute(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();

        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        // Seed = SMA of first 3 = 2.0; multiplier = 0.5
        assert!((out[2].unwrap() - 2.0).abs() < 1e-10);
        assert!((out[3].unwrap() - 3.0).abs() < 1e-10);
        assert!((out[4].unwrap() - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_ema_length_matches_input() {
        let ema = Ema::new(5).unwrap();
        let data: Vec<f64> = (0..40).map(|i| (i as f64 * 0.3).sin() + 10.0).collect();
        let out = ema.compute(&data).unwrap();
        assert_eq!(out.len(), data.len());
    }
}
