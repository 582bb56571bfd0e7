//! Performance metrics over a finished equity curve.

use marketlab_core::error::MetricsError;
use marketlab_core::types::{EquityCurve, Timeframe};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use tracing::debug;

/// Read-only metrics snapshot computed once from a completed curve.
///
/// Ratios that are undefined for the observed data (zero volatility, no
/// downside bars, no losing bars, no drawdown) are `None` rather than
/// infinite, zero, or NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    /// Cumulative return over the whole curve
    pub total_return: f64,
    /// Geometric annualized return
    pub annualized_return: f64,
    /// Sample standard deviation of per-bar returns, annualized
    pub annualized_volatility: f64,
    /// Annualized excess return over volatility
    pub sharpe_ratio: Option<f64>,
    /// Annualized excess return over downside deviation
    pub sortino_ratio: Option<f64>,
    /// Largest peak-to-trough decline, as a positive fraction
    pub max_drawdown: f64,
    /// Annualized return over max drawdown
    pub calmar_ratio: Option<f64>,
    /// Fraction of bars with a positive return
    pub win_rate: f64,
    /// Gross positive returns over gross negative returns
    pub profit_factor: Option<f64>,
    /// Sample skewness of the return distribution
    pub skewness: Option<f64>,
    /// Sample excess kurtosis of the return distribution
    pub kurtosis: Option<f64>,
    /// Benchmark cumulative return, when a benchmark was supplied
    pub benchmark_return: Option<f64>,
    /// Regression beta against the benchmark
    pub beta: Option<f64>,
    /// Annualized regression alpha against the benchmark
    pub alpha: Option<f64>,
}

impl PerformanceReport {
    /// Export for the reporting collaborator.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Derives a [`PerformanceReport`] from a completed [`EquityCurve`].
///
/// Pure: reads the curve (and optional benchmark), owns no simulator
/// state, and mutates nothing.
#[derive(Debug, Clone)]
pub struct PerformanceAnalyzer {
    periods_per_year: f64,
    risk_free_rate: f64,
}

impl PerformanceAnalyzer {
    /// Create an analyzer for curves sampled at `timeframe`, with an
    /// annualized risk-free rate.
    pub fn new(timeframe: Timeframe, risk_free_rate: f64) -> Self {
        Self {
            periods_per_year: timeframe.periods_per_year(),
            risk_free_rate,
        }
    }

    /// Compute the report, optionally against a benchmark curve.
    ///
    /// The benchmark must align point-for-point: same length, same
    /// timestamps.
    pub fn analyze(
        &self,
        curve: &EquityCurve,
        benchmark: Option<&EquityCurve>,
    ) -> Result<PerformanceReport, MetricsError> {
        if curve.len() < 2 {
            return Err(MetricsError::EmptyCurve);
        }

        let returns = curve.returns();
        let ppy = self.periods_per_year;
        let rf_per_bar = self.risk_free_rate / ppy;

        let mean = returns.as_slice().mean();
        // Sample deviation needs two returns; a shorter curve has none
        let std_dev = if returns.len() > 1 {
            returns.as_slice().std_dev()
        } else {
            0.0
        };

        let total_return = returns.iter().map(|r| 1.0 + r).product::<f64>() - 1.0;
        let annualized_return = (1.0 + mean).powf(ppy) - 1.0;
        let annualized_volatility = std_dev * ppy.sqrt();

        let mean_excess = mean - rf_per_bar;
        let sharpe_ratio =
            (std_dev > 0.0).then(|| mean_excess / std_dev * ppy.sqrt());

        let downside: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
        let sortino_ratio = if downside.len() > 1 {
            let downside_dev = downside.as_slice().std_dev();
            (downside_dev > 0.0).then(|| mean_excess / downside_dev * ppy.sqrt())
        } else {
            None
        };

        let max_drawdown = max_drawdown(curve);
        let calmar_ratio = (max_drawdown > 0.0).then(|| annualized_return / max_drawdown);

        let wins = returns.iter().filter(|r| **r > 0.0).count();
        let win_rate = wins as f64 / returns.len() as f64;

        let gross_profit: f64 = returns.iter().filter(|r| **r > 0.0).sum();
        let gross_loss: f64 = -returns.iter().filter(|r| **r < 0.0).sum::<f64>();
        let profit_factor = (gross_loss > 0.0).then(|| gross_profit / gross_loss);

        let skewness = sample_skewness(&returns, mean, std_dev);
        let kurtosis = sample_excess_kurtosis(&returns, mean, std_dev);

        let (benchmark_return, beta, alpha) = match benchmark {
            Some(bench) => {
                let bench_returns = self.aligned_returns(curve, bench)?;
                let bench_total =
                    bench_returns.iter().map(|r| 1.0 + r).product::<f64>() - 1.0;
                let bench_var = bench_returns.as_slice().variance();
                let beta = (bench_var > 0.0)
                    .then(|| returns.as_slice().covariance(bench_returns.as_slice()) / bench_var);
                let alpha = beta
                    .map(|b| (mean - b * bench_returns.as_slice().mean()) * ppy);
                (Some(bench_total), beta, alpha)
            }
            None => (None, None, None),
        };

        debug!(
            bars = returns.len(),
            total_return, max_drawdown, "performance analysis complete"
        );

        Ok(PerformanceReport {
            total_return,
            annualized_return,
            annualized_volatility,
            sharpe_ratio,
            sortino_ratio,
            max_drawdown,
            calmar_ratio,
            win_rate,
            profit_factor,
            skewness,
            kurtosis,
            benchmark_return,
            beta,
            alpha,
        })
    }

    fn aligned_returns(
        &self,
        curve: &EquityCurve,
        benchmark: &EquityCurve,
    ) -> Result<Vec<f64>, MetricsError> {
        if benchmark.len() != curve.len() {
            return Err(MetricsError::MisalignedSeries {
                reason: format!(
                    "benchmark has {} points, curve has {}",
                    benchmark.len(),
                    curve.len()
                ),
            });
        }
        for (i, (a, b)) in curve
            .points()
            .iter()
            .zip(benchmark.points().iter())
            .enumerate()
        {
            if a.timestamp != b.timestamp {
                return Err(MetricsError::MisalignedSeries {
                    reason: format!("benchmark timestamp diverges at index {i}"),
                });
            }
        }
        Ok(benchmark.returns())
    }
}

/// Largest peak-to-trough decline, tracked with a running peak.
fn max_drawdown(curve: &EquityCurve) -> f64 {
    let mut peak = f64::MIN;
    let mut worst: f64 = 0.0;

    for point in curve.points() {
        let equity = decimal_to_f64(point.equity);
        if equity > peak {
            peak = equity;
        }
        if peak > 0.0 {
            worst = worst.max((peak - equity) / peak);
        }
    }

    worst
}

fn sample_skewness(returns: &[f64], mean: f64, std_dev: f64) -> Option<f64> {
    let n = returns.len();
    if n < 3 || std_dev == 0.0 {
        return None;
    }
    let n_f = n as f64;
    let m3: f64 = returns.iter().map(|r| ((r - mean) / std_dev).powi(3)).sum();
    Some(n_f / ((n_f - 1.0) * (n_f - 2.0)) * m3)
}

fn sample_excess_kurtosis(returns: &[f64], mean: f64, std_dev: f64) -> Option<f64> {
    let n = returns.len();
    if n < 4 || std_dev == 0.0 {
        return None;
    }
    let n_f = n as f64;
    let m4: f64 = returns.iter().map(|r| ((r - mean) / std_dev).powi(4)).sum();
    let core = n_f * (n_f + 1.0) / ((n_f - 1.0) * (n_f - 2.0) * (n_f - 3.0)) * m4;
    let correction = 3.0 * (n_f - 1.0).powi(2) / ((n_f - 2.0) * (n_f - 3.0));
    Some(core - correction)
}

fn decimal_to_f64(value: rust_decimal::Decimal) -> f64 {
    use rust_decimal::prelude::ToPrimitive;
    value.to_f64().unwrap_or(0.0)
}
