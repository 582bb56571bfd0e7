//! Signal blending.
//!
//! Maps indicator columns through directional transforms onto a common
//! `[-1, 1]` scale, then combines them as a weighted sum into one
//! [`SignalSeries`]. Bars where any referenced column is still `None`
//! propagate as `None` — a missing indicator never contributes a silent
//! zero.

mod blender;

pub use blender::{SignalBlender, SignalComponent, SignalWeightConfig, Transform};
