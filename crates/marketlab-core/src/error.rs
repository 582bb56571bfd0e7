//! Error types for the marketlab engine.

use rust_decimal::Decimal;
use thiserror::Error;

/// Top-level engine error.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("Signal error: {0}")]
    Signal(#[from] SignalError),

    #[error("Backtest error: {0}")]
    Backtest(#[from] BacktestError),

    #[error("Metrics error: {0}")]
    Metrics(#[from] MetricsError),
}

/// Series validation errors.
///
/// These are unrecoverable for the instrument whose series triggered them:
/// the pipeline aborts and surfaces the error to the caller.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("malformed bar at index {index}: {reason}")]
    MalformedBar { index: usize, reason: String },

    #[error("conflicting corporate action at timestamp {timestamp}: {reason}")]
    AdjustmentConflict { timestamp: i64, reason: String },
}

/// Indicator calculation errors.
#[derive(Error, Debug)]
pub enum IndicatorError {
    #[error("insufficient data: need {required} bars, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Signal blending errors.
#[derive(Error, Debug)]
pub enum SignalError {
    #[error("weight config references unknown indicator column: {0}")]
    UnknownIndicator(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Backtest simulation errors.
#[derive(Error, Debug)]
pub enum BacktestError {
    #[error("insufficient capital: required {required}, available {available}")]
    InsufficientCapital {
        required: Decimal,
        available: Decimal,
    },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Performance analysis errors.
#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("misaligned series: {reason}")]
    MisalignedSeries { reason: String },

    #[error("equity curve has fewer than two points")]
    EmptyCurve,
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
