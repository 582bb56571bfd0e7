//! Weighted indicator-to-signal blending.

use marketlab_core::error::SignalError;
use marketlab_core::types::{IndicatorFrame, SignalSeries};
use serde::{Deserialize, Serialize};

/// Directional transform mapping a raw indicator value onto `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transform {
    /// Mean-reversion read of a bounded oscillator: above `overbought`
    /// contributes -1 (sell bias), below `oversold` contributes +1.
    Oscillator { overbought: f64, oversold: f64 },
    /// Sign of the value, for zero-centered series such as a MACD histogram.
    Sign,
    /// Value divided by `divisor`, clamped to `[-1, 1]`; for inputs already
    /// near signal scale such as external sentiment scores.
    Scaled { divisor: f64 },
}

impl Transform {
    fn validate(&self) -> Result<(), SignalError> {
        match *self {
            Transform::Oscillator {
                overbought,
                oversold,
            } => {
                if !overbought.is_finite() || !oversold.is_finite() || overbought <= oversold {
                    return Err(SignalError::InvalidParameter(format!(
                        "oscillator thresholds overbought={overbought} oversold={oversold} \
                         must be finite with overbought > oversold"
                    )));
                }
            }
            Transform::Sign => {}
            Transform::Scaled { divisor } => {
                if !divisor.is_finite() || divisor == 0.0 {
                    return Err(SignalError::InvalidParameter(format!(
                        "scale divisor {divisor} must be finite and non-zero"
                    )));
                }
            }
        }
        Ok(())
    }

    fn apply(&self, value: f64) -> f64 {
        match *self {
            Transform::Oscillator {
                overbought,
                oversold,
            } => {
                if value > overbought {
                    -1.0
                } else if value < oversold {
                    1.0
                } else {
                    0.0
                }
            }
            Transform::Sign => {
                if value > 0.0 {
                    1.0
                } else if value < 0.0 {
                    -1.0
                } else {
                    0.0
                }
            }
            Transform::Scaled { divisor } => (value / divisor).clamp(-1.0, 1.0),
        }
    }
}

/// One weighted contribution to the blended signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalComponent {
    /// Frame column the contribution reads
    pub indicator: String,
    /// Weight applied after the transform; absolute values need not sum to 1
    pub weight: f64,
    /// Directional transform onto `[-1, 1]`
    pub transform: Transform,
}

/// Ordered set of weighted components.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SignalWeightConfig {
    pub components: Vec<SignalComponent>,
}

impl SignalWeightConfig {
    /// Build from components.
    pub fn new(components: Vec<SignalComponent>) -> Self {
        Self { components }
    }
}

/// Blends an [`IndicatorFrame`] into a [`SignalSeries`].
///
/// Construction fails when the config references a column the frame does
/// not carry, or a weight/transform parameter is malformed. Blending is
/// deterministic: identical frame and config always produce an identical
/// series.
#[derive(Debug)]
pub struct SignalBlender<'f> {
    config: SignalWeightConfig,
    frame: &'f IndicatorFrame,
}

impl<'f> SignalBlender<'f> {
    /// Validate the config against the frame.
    pub fn new(
        config: SignalWeightConfig,
        frame: &'f IndicatorFrame,
    ) -> Result<Self, SignalError> {
        if config.components.is_empty() {
            return Err(SignalError::InvalidParameter(
                "weight config has no components".to_string(),
            ));
        }

        for component in &config.components {
            if !frame.contains(&component.indicator) {
                return Err(SignalError::UnknownIndicator(component.indicator.clone()));
            }
            if !component.weight.is_finite() {
                return Err(SignalError::InvalidParameter(format!(
                    "weight for {} is not finite",
                    component.indicator
                )));
            }
            component.transform.validate()?;
        }

        Ok(Self { config, frame })
    }

    /// Produce the per-bar signal series.
    pub fn blend(&self) -> SignalSeries {
        let len = self.frame.len();
        let mut values: Vec<Option<f64>> = Vec::with_capacity(len);

        for bar in 0..len {
            let mut total = 0.0;
            let mut defined = true;

            for component in &self.config.components {
                match self.frame.value(&component.indicator, bar) {
                    Some(v) if v.is_finite() => {
                        total += component.weight * component.transform.apply(v);
                    }
                    _ => {
                        defined = false;
                        break;
                    }
                }
            }

            values.push(defined.then_some(total));
        }

        SignalSeries::new(values)
    }
}
