//! Core types and error taxonomy for the marketlab engine.
//!
//! This crate provides the foundational building blocks shared by every
//! pipeline stage:
//! - Market data types (Bar, BarSeries, Timeframe)
//! - Aligned indicator and signal containers (IndicatorFrame, SignalSeries)
//! - Simulation state types (Position, Trade, EquityCurve)
//! - The error taxonomy surfaced by the whole engine

pub mod error;
pub mod types;

pub use error::{EngineError, EngineResult};
pub use types::*;
