//! Aligned indicator columns keyed by name.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{EngineResult, MetricsError};

/// Mapping from indicator name to a value series aligned to a bar series.
///
/// Every column has exactly the frame's length; positions with insufficient
/// lookback carry `None`, the "not yet available" marker. A marker is never
/// encoded as `0.0` and float NaN is never used as a sentinel.
///
/// A `BTreeMap` keeps column iteration order deterministic, which the
/// blender relies on for byte-identical re-runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndicatorFrame {
    len: usize,
    columns: BTreeMap<String, Vec<Option<f64>>>,
}

impl IndicatorFrame {
    /// Create an empty frame for a series of the given length.
    pub fn new(len: usize) -> Self {
        Self {
            len,
            columns: BTreeMap::new(),
        }
    }

    /// Number of rows (bars) each column spans.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the frame spans zero bars.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a column. Fails when the column length does not match the
    /// frame; this is also the entry point for externally supplied columns
    /// such as per-date sentiment scores.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> EngineResult<()> {
        if values.len() != self.len {
            return Err(MetricsError::MisalignedSeries {
                reason: format!(
                    "column length {} does not match frame length {}",
                    values.len(),
                    self.len
                ),
            }
            .into());
        }
        self.columns.insert(name.into(), values);
        Ok(())
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns.get(name).map(|v| v.as_slice())
    }

    /// Whether a column exists.
    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Value at (column, row); `None` for markers or unknown columns.
    pub fn value(&self, name: &str, index: usize) -> Option<f64> {
        self.columns.get(name).and_then(|c| c.get(index)).copied().flatten()
    }

    /// Names of every column in deterministic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|k| k.as_str())
    }

    /// Merge all columns of another frame of the same length into this one.
    pub fn merge(&mut self, other: IndicatorFrame) -> EngineResult<()> {
        for (name, values) in other.columns {
            self.insert(name, values)?;
        }
        Ok(())
    }
}
