//! Blended trading signal series.

use serde::{Deserialize, Serialize};

/// Per-bar trading signal in `[-1.0, 1.0]`, aligned by index to a bar
/// series. `None` marks bars where at least one input indicator was not yet
/// available; the simulator holds its state on such bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSeries(Vec<Option<f64>>);

impl SignalSeries {
    /// Wrap raw per-bar values. Defined values are clamped to `[-1, 1]`.
    pub fn new(values: Vec<Option<f64>>) -> Self {
        Self(
            values
                .into_iter()
                .map(|v| v.map(|x| x.clamp(-1.0, 1.0)))
                .collect(),
        )
    }

    /// Number of bars covered.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the series spans zero bars.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Signal at a bar index; `None` for markers and out-of-range.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied().flatten()
    }

    /// The raw per-bar values.
    pub fn values(&self) -> &[Option<f64>] {
        &self.0
    }

    /// Iterate over per-bar values.
    pub fn iter(&self) -> impl Iterator<Item = &Option<f64>> {
        self.0.iter()
    }
}
