//! Configuration structures.

use marketlab_backtest::SimulatorConfig;
use marketlab_core::types::Timeframe;
use marketlab_indicators::IndicatorSpec;
use marketlab_series::GapPolicy;
use marketlab_signals::{SignalComponent, SignalWeightConfig, Transform};
use serde::{Deserialize, Serialize};

/// Full engine configuration for one run.
///
/// Explicitly passed into each pipeline invocation; no process-wide state
/// persists between instrument runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub series: SeriesSettings,
    #[serde(default = "default_indicators")]
    pub indicators: Vec<IndicatorSpec>,
    #[serde(default = "default_signal")]
    pub signal: SignalWeightConfig,
    #[serde(default)]
    pub simulator: SimulatorConfig,
    #[serde(default)]
    pub analysis: AnalysisSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            series: SeriesSettings::default(),
            indicators: default_indicators(),
            signal: default_signal(),
            simulator: SimulatorConfig::default(),
            analysis: AnalysisSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

/// Series validation settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SeriesSettings {
    /// Expected nominal interval of incoming bars
    #[serde(default)]
    pub timeframe: Timeframe,
    /// How missing intervals are handled
    #[serde(default)]
    pub gap_policy: GapPolicy,
}

/// Performance analysis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Annualized risk-free rate used for excess returns
    pub risk_free_rate: f64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.02,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

fn default_indicators() -> Vec<IndicatorSpec> {
    vec![
        IndicatorSpec::Rsi { lookback: 14 },
        IndicatorSpec::Macd {
            fast: 12,
            slow: 26,
            signal: 9,
        },
    ]
}

fn default_signal() -> SignalWeightConfig {
    SignalWeightConfig::new(vec![
        SignalComponent {
            indicator: "rsi_14".to_string(),
            weight: 0.5,
            transform: Transform::Oscillator {
                overbought: 70.0,
                oversold: 30.0,
            },
        },
        SignalComponent {
            indicator: "macd_hist".to_string(),
            weight: 0.5,
            transform: Transform::Sign,
        },
    ])
}
