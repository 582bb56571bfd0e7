//! Single-instrument pipeline.

use marketlab_backtest::{BacktestResult, BacktestSimulator, PerformanceAnalyzer, PerformanceReport};
use marketlab_config::EngineConfig;
use marketlab_core::error::EngineResult;
use marketlab_core::types::{Bar, EquityCurve};
use marketlab_indicators::compute_frame;
use marketlab_series::{adjust_for_actions, CorporateAction, SeriesValidator};
use marketlab_signals::SignalBlender;
use tracing::{debug, info};

/// Raw inputs for one instrument, as handed over by the data-acquisition
/// collaborator.
#[derive(Debug, Clone)]
pub struct InstrumentData {
    pub symbol: String,
    /// Ordered raw bars, not yet validated
    pub bars: Vec<Bar>,
    /// Corporate-action event table, possibly empty
    pub actions: Vec<CorporateAction>,
    /// Optional per-bar sentiment scores, aligned to the validated series
    /// with the same marker contract as indicator columns
    pub sentiment: Option<Vec<Option<f64>>>,
}

impl InstrumentData {
    /// Bars only, no adjustments or sentiment.
    pub fn from_bars(symbol: impl Into<String>, bars: Vec<Bar>) -> Self {
        Self {
            symbol: symbol.into(),
            bars,
            actions: Vec::new(),
            sentiment: None,
        }
    }
}

/// Output of one completed instrument pipeline.
#[derive(Debug, Clone)]
pub struct InstrumentResult {
    pub symbol: String,
    /// Equity curve, trade log, and terminal position state
    pub backtest: BacktestResult,
    /// Metrics snapshot over the finished curve
    pub report: PerformanceReport,
}

/// Run the full pipeline for one instrument.
///
/// Stages run strictly in order over owned state; the first error aborts
/// the instrument and nothing partial is returned.
pub fn run_instrument(
    data: &InstrumentData,
    config: &EngineConfig,
    benchmark: Option<&EquityCurve>,
) -> EngineResult<InstrumentResult> {
    let adjusted = adjust_for_actions(&data.bars, &data.actions)?;

    let validator = SeriesValidator::new(config.series.timeframe, config.series.gap_policy);
    let series = validator.validate(&data.symbol, &adjusted)?;
    debug!(symbol = %data.symbol, bars = series.len(), "series validated");

    let mut frame = compute_frame(&series, &config.indicators)?;
    if let Some(sentiment) = &data.sentiment {
        frame.insert("sentiment", sentiment.clone())?;
    }

    let signal = SignalBlender::new(config.signal.clone(), &frame)?.blend();

    let simulator = BacktestSimulator::new(config.simulator.clone())?;
    let backtest = simulator.run(&series, &signal)?;

    let analyzer =
        PerformanceAnalyzer::new(config.series.timeframe, config.analysis.risk_free_rate);
    let report = analyzer.analyze(&backtest.equity_curve, benchmark)?;

    info!(
        symbol = %data.symbol,
        trades = backtest.trades.len(),
        total_return = report.total_return,
        max_drawdown = report.max_drawdown,
        "pipeline complete"
    );

    Ok(InstrumentResult {
        symbol: data.symbol.clone(),
        backtest,
        report,
    })
}
