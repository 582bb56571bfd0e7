//! Momentum indicators.

use marketlab_core::error::IndicatorError;

use crate::{ema_masked, ensure_history, ensure_lookback};

/// Relative Strength Index (RSI) with Wilder's smoothing.
///
/// When the average loss over the window is zero the oscillator saturates
/// at 100 instead of dividing by zero. The first `lookback` positions are
/// `None` (one price change per lookback step).
#[derive(Debug, Clone)]
pub struct Rsi {
    lookback: usize,
}

impl Rsi {
    /// Create a new RSI.
    pub fn new(lookback: usize) -> Result<Self, IndicatorError> {
        ensure_lookback(lookback)?;
        Ok(Self { lookback })
    }

    /// Compute over a close series.
    pub fn compute(&self, closes: &[f64]) -> Result<Vec<Option<f64>>, IndicatorError> {
        ensure_history(self.lookback + 1, closes.len())?;

        let lookback_f64 = self.lookback as f64;
        let mut out = vec![None; closes.len()];

        // (avg_gain, avg_loss) once seeded
        let mut averages: Option<(f64, f64)> = None;
        let mut seed_gain = 0.0;
        let mut seed_loss = 0.0;
        let mut seed_count = 0usize;

        for i in 1..closes.len() {
            let (prev, curr) = (closes[i - 1], closes[i]);
            if !prev.is_finite() || !curr.is_finite() {
                averages = None;
                seed_gain = 0.0;
                seed_loss = 0.0;
                seed_count = 0;
                continue;
            }

            let change = curr - prev;
            let (gain, loss) = if change > 0.0 {
                (change, 0.0)
            } else {
                (0.0, -change)
            };

            match averages {
                Some((avg_gain, avg_loss)) => {
                    // Wilder's smoothing: avg = (prev_avg * (n-1) + value) / n
                    let avg_gain = (avg_gain * (lookback_f64 - 1.0) + gain) / lookback_f64;
                    let avg_loss = (avg_loss * (lookback_f64 - 1.0) + loss) / lookback_f64;
                    averages = Some((avg_gain, avg_loss));
                    out[i] = Some(Self::oscillator(avg_gain, avg_loss));
                }
                None => {
                    seed_gain += gain;
                    seed_loss += loss;
                    seed_count += 1;
                    if seed_count == self.lookback {
                        let avg_gain = seed_gain / lookback_f64;
                        let avg_loss = seed_loss / lookback_f64;
                        averages = Some((avg_gain, avg_loss));
                        out[i] = Some(Self::oscillator(avg_gain, avg_loss));
                        seed_gain = 0.0;
                        seed_loss = 0.0;
                        seed_count = 0;
                    }
                }
            }
        }

        Ok(out)
    }

    fn oscillator(avg_gain: f64, avg_loss: f64) -> f64 {
        if avg_loss == 0.0 {
            // Saturated: all gains over the window
            100.0
        } else {
            100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
        }
    }
}

/// Aligned MACD output columns, each the full series length.
#[derive(Debug, Clone)]
pub struct MacdOutput {
    /// Fast EMA minus slow EMA
    pub macd: Vec<Option<f64>>,
    /// EMA of the MACD line
    pub signal: Vec<Option<f64>>,
    /// MACD minus signal
    pub histogram: Vec<Option<f64>>,
}

/// Moving Average Convergence Divergence.
#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
}

impl Macd {
    /// Create a new MACD. Fast must be shorter than slow.
    pub fn new(fast: usize, slow: usize, signal: usize) -> Result<Self, IndicatorError> {
        ensure_lookback(fast)?;
        ensure_lookback(slow)?;
        ensure_lookback(signal)?;
        if fast >= slow {
            return Err(IndicatorError::InvalidParameter(format!(
                "fast period {fast} must be less than slow period {slow}"
            )));
        }
        Ok(Self { fast, slow, signal })
    }

    /// Compute over a close series.
    pub fn compute(&self, closes: &[f64]) -> Result<MacdOutput, IndicatorError> {
        ensure_history(self.slow + self.signal, closes.len())?;

        let masked: Vec<Option<f64>> = closes
            .iter()
            .map(|&v| v.is_finite().then_some(v))
            .collect();

        let fast_ema = ema_masked(&masked, self.fast);
        let slow_ema = ema_masked(&masked, self.slow);

        let macd: Vec<Option<f64>> = fast_ema
            .iter()
            .zip(slow_ema.iter())
            .map(|(f, s)| match (f, s) {
                (Some(f), Some(s)) => Some(f - s),
                _ => None,
            })
            .collect();

        let signal = ema_masked(&macd, self.signal);

        let histogram: Vec<Option<f64>> = macd
            .iter()
            .zip(signal.iter())
            .map(|(m, s)| match (m, s) {
                (Some(m), Some(s)) => Some(m - s),
                _ => None,
            })
            .collect();

        Ok(MacdOutput {
            macd,
            signal,
            histogram,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_all_gains_saturates() {
        let rsi = Rsi::new(5).unwrap();
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let out = rsi.compute(&data).unwrap();

        assert_eq!(out[4], None);
        assert!((out[5].unwrap() - 100.0).abs() < 1e-10);
        assert!((out[6].unwrap() - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_rsi_all_losses() {
        let rsi = Rsi::new(5).unwrap();
        let data = vec![7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0];
        let out = rsi.compute(&data).unwrap();

        assert!(out[5].unwrap().abs() < 1e-10);
    }

    #[test]
    fn test_rsi_bounded() {
        let rsi = Rsi::new(14).unwrap();
        let data: Vec<f64> = (0..60)
            .map(|i| 100.0 + (i as f64 * 0.5).sin() * 5.0)
            .collect();
        let out = rsi.compute(&data).unwrap();

        for value in out.iter().flatten() {
            assert!((0.0..=100.0).contains(value));
        }
        // Exactly the first `lookback` positions undefined
        assert_eq!(out.iter().filter(|v| v.is_none()).count(), 14);
    }

    #[test]
    fn test_rsi_insufficient_history() {
        let rsi = Rsi::new(14).unwrap();
        assert!(rsi.compute(&[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_macd_rejects_inverted_periods() {
        assert!(Macd::new(26, 12, 9).is_err());
        assert!(Macd::new(12, 26, 0).is_err());
    }

    #[test]
    fn test_macd_alignment_and_warmup() {
        let macd = Macd::new(3, 6, 2).unwrap();
        let data: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let out = macd.compute(&data).unwrap();

        assert_eq!(out.macd.len(), data.len());
        assert_eq!(out.signal.len(), data.len());
        assert_eq!(out.histogram.len(), data.len());

        // MACD defined once the slow EMA is seeded
        assert_eq!(out.macd[4], None);
        assert!(out.macd[5].is_some());
        // Signal needs two defined MACD values
        assert_eq!(out.signal[5], None);
        assert!(out.signal[6].is_some());
        // Histogram = macd - signal wherever both exist
        let idx = 10;
        let expected = out.macd[idx].unwrap() - out.signal[idx].unwrap();
        assert!((out.histogram[idx].unwrap() - expected).abs() < 1e-10);
    }

    #[test]
    fn test_macd_positive_in_uptrend() {
        let macd = Macd::new(12, 26, 9).unwrap();
        let data: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let out = macd.compute(&data).unwrap();

        assert!(out.macd.last().unwrap().unwrap() > 0.0);
    }
}
