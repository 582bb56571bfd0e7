//! Pipeline wiring for the marketlab engine.
//!
//! One instrument flows Validator -> Indicators -> Blender -> Simulator ->
//! Analyzer, synchronously and in bar order. Independent instruments run in
//! parallel worker tasks with no shared mutable state; an instrument either
//! completes its full series or fails atomically.

pub mod logging;
mod pipeline;
mod runner;

pub use pipeline::{run_instrument, InstrumentData, InstrumentResult};
pub use runner::{run_universe, UniverseRun};
