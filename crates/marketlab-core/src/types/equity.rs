//! Equity curve emitted by the backtest simulator.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Total account equity at one bar close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Cash plus position value marked at the bar close
    pub equity: Decimal,
}

/// Ordered (timestamp, equity) pairs, one per processed bar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquityCurve {
    points: Vec<EquityPoint>,
}

impl EquityCurve {
    /// An empty curve.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an equity point. Timestamps must arrive in order; the
    /// simulator walks bars chronologically so this is not re-checked here.
    pub fn push(&mut self, timestamp: i64, equity: Decimal) {
        self.points.push(EquityPoint { timestamp, equity });
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the curve has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All points in order.
    pub fn points(&self) -> &[EquityPoint] {
        &self.points
    }

    /// The final equity value, if any bars were processed.
    pub fn final_equity(&self) -> Option<Decimal> {
        self.points.last().map(|p| p.equity)
    }

    /// Simple per-bar percentage returns as f64, one per point after the
    /// first. Zero-equity points yield a zero return rather than a division
    /// blowup; the analyzer treats the curve as already validated.
    pub fn returns(&self) -> Vec<f64> {
        self.points
            .windows(2)
            .map(|w| {
                if w[0].equity == Decimal::ZERO {
                    0.0
                } else {
                    let ratio = w[1].equity / w[0].equity - Decimal::ONE;
                    ratio.to_f64().unwrap_or(0.0)
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_push_and_final() {
        let mut curve = EquityCurve::new();
        curve.push(1, dec!(100));
        curve.push(2, dec!(110));

        assert_eq!(curve.len(), 2);
        assert_eq!(curve.final_equity(), Some(dec!(110)));
    }

    #[test]
    fn test_returns() {
        let mut curve = EquityCurve::new();
        curve.push(1, dec!(100));
        curve.push(2, dec!(110));
        curve.push(3, dec!(99));

        let returns = curve.returns();
        assert_eq!(returns.len(), 2);
        assert!((returns[0] - 0.10).abs() < 1e-12);
        assert!((returns[1] + 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_constant_curve_zero_returns() {
        let mut curve = EquityCurve::new();
        for i in 0..4 {
            curve.push(i, dec!(100));
        }
        assert!(curve.returns().iter().all(|r| *r == 0.0));
    }
}
