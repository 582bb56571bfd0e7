//! End-to-end pipeline tests.

use marketlab_config::EngineConfig;
use marketlab_core::error::EngineError;
use marketlab_core::types::Bar;
use marketlab_engine::{run_instrument, run_universe, InstrumentData};
use marketlab_indicators::IndicatorSpec;
use marketlab_signals::{SignalComponent, SignalWeightConfig, Transform};
use rust_decimal_macros::dec;

const DAY: i64 = 86_400_000;

fn wave_bars(n: usize) -> Vec<Bar> {
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.35).sin() * 12.0;
            Bar::new(i as i64 * DAY, close, close + 1.5, close - 1.5, close, 10_000.0)
        })
        .collect()
}

/// Single macd-histogram component: the signal is +/-1 wherever defined,
/// which reliably produces trades over oscillating prices.
fn trending_config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.indicators = vec![IndicatorSpec::Macd {
        fast: 5,
        slow: 12,
        signal: 4,
    }];
    config.signal = SignalWeightConfig::new(vec![SignalComponent {
        indicator: "macd_hist".to_string(),
        weight: 1.0,
        transform: Transform::Sign,
    }]);
    config
}

#[test]
fn test_idempotent_rerun() {
    let data = InstrumentData::from_bars("WAVE", wave_bars(90));
    let config = trending_config();

    let first = run_instrument(&data, &config, None).unwrap();
    let second = run_instrument(&data, &config, None).unwrap();

    assert_eq!(first.backtest.equity_curve, second.backtest.equity_curve);
    assert_eq!(first.backtest.trades, second.backtest.trades);
    assert_eq!(first.report, second.report);
    assert!(!first.backtest.trades.is_empty());
}

#[test]
fn test_no_lookahead_truncation() {
    let config = trending_config();
    let full_data = InstrumentData::from_bars("WAVE", wave_bars(100));
    let truncated_data = InstrumentData::from_bars("WAVE", wave_bars(100)[..60].to_vec());

    let full = run_instrument(&full_data, &config, None).unwrap();
    let truncated = run_instrument(&truncated_data, &config, None).unwrap();

    // Decisions at bar i depend only on bars <= i, so the shorter replay
    // walks the identical equity path
    assert_eq!(
        &full.backtest.equity_curve.points()[..60],
        truncated.backtest.equity_curve.points()
    );

    // Entries decided before the truncation point are identical
    let full_entries: Vec<usize> = full
        .backtest
        .trades
        .iter()
        .map(|t| t.entry_index)
        .filter(|i| *i < 60)
        .collect();
    let truncated_entries: Vec<usize> = truncated
        .backtest
        .trades
        .iter()
        .map(|t| t.entry_index)
        .collect();
    assert_eq!(full_entries, truncated_entries);
}

#[test]
fn test_zero_weight_signal_trades_nothing() {
    let mut config = trending_config();
    config.signal.components[0].weight = 0.0;

    let data = InstrumentData::from_bars("WAVE", wave_bars(60));
    let result = run_instrument(&data, &config, None).unwrap();

    assert!(result.backtest.trades.is_empty());
    for point in result.backtest.equity_curve.points() {
        assert_eq!(point.equity, dec!(100000));
    }
    assert_eq!(result.report.total_return, 0.0);
}

#[test]
fn test_sentiment_drives_signal() {
    let mut config = EngineConfig::default();
    config.indicators = vec![];
    config.signal = SignalWeightConfig::new(vec![SignalComponent {
        indicator: "sentiment".to_string(),
        weight: 1.0,
        transform: Transform::Scaled { divisor: 1.0 },
    }]);
    config.simulator.slippage_bps = dec!(0);

    let bars = wave_bars(6);
    let mut sentiment: Vec<Option<f64>> = vec![None, Some(0.9), Some(0.9), Some(0.9), Some(-0.9), Some(-0.9)];
    let mut data = InstrumentData::from_bars("NEWS", bars);
    data.sentiment = Some(sentiment.clone());

    let result = run_instrument(&data, &config, None).unwrap();
    assert_eq!(result.backtest.trades.len(), 1);
    assert_eq!(result.backtest.trades[0].entry_index, 1);
    assert_eq!(result.backtest.trades[0].exit_index, Some(4));

    // Misaligned sentiment aborts the run
    sentiment.pop();
    data.sentiment = Some(sentiment);
    let err = run_instrument(&data, &config, None).unwrap_err();
    assert!(matches!(err, EngineError::Metrics(_)));
}

#[test]
fn test_malformed_bar_aborts_pipeline() {
    let mut bars = wave_bars(40);
    bars[7].high = bars[7].low - 1.0;

    let data = InstrumentData::from_bars("BAD", bars);
    let err = run_instrument(&data, &trending_config(), None).unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[test]
fn test_unknown_indicator_aborts_pipeline() {
    let mut config = trending_config();
    config.signal.components[0].indicator = "bogus".to_string();

    let data = InstrumentData::from_bars("WAVE", wave_bars(40));
    let err = run_instrument(&data, &config, None).unwrap_err();
    assert!(matches!(err, EngineError::Signal(_)));
}

#[tokio::test]
async fn test_universe_matches_sequential_runs() {
    let config = trending_config();
    let alpha = InstrumentData::from_bars("ALPHA", wave_bars(80));
    let beta = InstrumentData::from_bars("BETA", {
        (0..80)
            .map(|i| {
                let close = 50.0 + (i as f64 * 0.5).cos() * 8.0;
                Bar::new(i as i64 * DAY, close, close + 1.0, close - 1.0, close, 5_000.0)
            })
            .collect()
    });

    let sequential: Vec<_> = [&alpha, &beta]
        .into_iter()
        .map(|data| run_instrument(data, &config, None).unwrap())
        .collect();

    let run = run_universe(vec![alpha, beta], config, None).await;
    assert!(run.failed.is_empty());
    assert_eq!(run.completed.len(), 2);

    for (parallel, expected) in run.completed.iter().zip(sequential.iter()) {
        assert_eq!(parallel.symbol, expected.symbol);
        assert_eq!(parallel.backtest.equity_curve, expected.backtest.equity_curve);
        assert_eq!(parallel.report, expected.report);
    }
}

#[tokio::test]
async fn test_universe_isolates_failures() {
    let good = InstrumentData::from_bars("GOOD", wave_bars(60));
    let bad = InstrumentData::from_bars("BAD", {
        let mut bars = wave_bars(60);
        bars[3].close = f64::NAN;
        bars
    });

    let run = run_universe(vec![good, bad], trending_config(), None).await;

    assert_eq!(run.completed.len(), 1);
    assert_eq!(run.completed[0].symbol, "GOOD");
    assert_eq!(run.failed.len(), 1);
    assert_eq!(run.failed[0].0, "BAD");
    assert!(matches!(run.failed[0].1, EngineError::Validation(_)));
}
