//! Backtesting engine.
//!
//! [`BacktestSimulator`] replays a signal series over its bar series with
//! slippage and commission frictions, producing an equity curve and trade
//! log. [`PerformanceAnalyzer`] derives risk-adjusted metrics from the
//! finished curve; it never touches simulator state.

mod engine;
mod statistics;

pub use engine::{BacktestResult, BacktestSimulator, CommissionModel, SimulatorConfig};
pub use statistics::{PerformanceAnalyzer, PerformanceReport};
