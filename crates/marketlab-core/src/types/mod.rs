//! Core data types for the engine.

mod bar;
mod equity;
mod frame;
mod position;
mod signal;
mod timeframe;
mod trade;

pub use bar::{Bar, BarSeries};
pub use equity::{EquityCurve, EquityPoint};
pub use frame::IndicatorFrame;
pub use position::Position;
pub use signal::SignalSeries;
pub use timeframe::Timeframe;
pub use trade::{Side, Trade};
