//! Corporate-action (split/dividend) adjustment.

use marketlab_core::error::ValidationError;
use marketlab_core::types::Bar;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One multiplicative adjustment event.
///
/// All bars strictly before `effective` are rescaled by `factor` so that the
/// return across the event date stays continuous. A 2:1 split is a factor of
/// 0.5; a cash dividend of d on close p is (p - d) / p.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorporateAction {
    /// Effective timestamp (Unix ms); the first bar trading at the new basis
    pub effective: i64,
    /// Multiplicative price factor applied to earlier bars
    pub factor: f64,
}

/// Apply an event table to a bar slice, returning rescaled copies.
///
/// The input is not mutated. Duplicate effective timestamps and
/// non-positive or non-finite factors are conflicts.
pub fn adjust_for_actions(
    raw: &[Bar],
    actions: &[CorporateAction],
) -> Result<Vec<Bar>, ValidationError> {
    let mut sorted: Vec<CorporateAction> = actions.to_vec();
    sorted.sort_by_key(|a| a.effective);

    for pair in sorted.windows(2) {
        if pair[0].effective == pair[1].effective {
            return Err(ValidationError::AdjustmentConflict {
                timestamp: pair[0].effective,
                reason: "two events share an effective date".to_string(),
            });
        }
    }
    for action in &sorted {
        if !action.factor.is_finite() || action.factor <= 0.0 {
            return Err(ValidationError::AdjustmentConflict {
                timestamp: action.effective,
                reason: format!("factor {} is not a positive real", action.factor),
            });
        }
    }

    let mut bars: Vec<Bar> = raw.to_vec();
    for action in &sorted {
        for bar in bars.iter_mut().filter(|b| b.timestamp < action.effective) {
            bar.open *= action.factor;
            bar.high *= action.factor;
            bar.low *= action.factor;
            bar.close *= action.factor;
            // Keep pre-event notional (price x volume) unchanged
            bar.volume /= action.factor;
        }
    }

    if !sorted.is_empty() {
        debug!(events = sorted.len(), "applied corporate-action adjustments");
    }

    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 86_400_000;

    fn bar(ts: i64, close: f64) -> Bar {
        Bar::new(ts, close, close + 1.0, close - 1.0, close, 1000.0)
    }

    #[test]
    fn test_split_rescales_history() {
        // 2:1 split effective on day 2: pre-split prices halve
        let raw = vec![bar(0, 100.0), bar(DAY, 102.0), bar(2 * DAY, 51.0)];
        let actions = vec![CorporateAction {
            effective: 2 * DAY,
            factor: 0.5,
        }];

        let adjusted = adjust_for_actions(&raw, &actions).unwrap();
        assert_eq!(adjusted[0].close, 50.0);
        assert_eq!(adjusted[1].close, 51.0);
        assert_eq!(adjusted[2].close, 51.0);
        assert_eq!(adjusted[0].volume, 2000.0);
    }

    #[test]
    fn test_return_continuity_across_event() {
        let raw = vec![bar(0, 100.0), bar(DAY, 100.0), bar(2 * DAY, 50.0)];
        let actions = vec![CorporateAction {
            effective: 2 * DAY,
            factor: 0.5,
        }];

        let adjusted = adjust_for_actions(&raw, &actions).unwrap();
        // A flat market adjusted for the split shows a flat return path
        let r = (adjusted[2].close - adjusted[1].close) / adjusted[1].close;
        assert!(r.abs() < 1e-12);
    }

    #[test]
    fn test_duplicate_event_conflicts() {
        let raw = vec![bar(0, 100.0)];
        let actions = vec![
            CorporateAction {
                effective: DAY,
                factor: 0.5,
            },
            CorporateAction {
                effective: DAY,
                factor: 0.25,
            },
        ];

        let err = adjust_for_actions(&raw, &actions).unwrap_err();
        assert!(matches!(err, ValidationError::AdjustmentConflict { .. }));
    }

    #[test]
    fn test_bad_factor_conflicts() {
        let raw = vec![bar(0, 100.0)];
        let actions = vec![CorporateAction {
            effective: DAY,
            factor: 0.0,
        }];

        assert!(adjust_for_actions(&raw, &actions).is_err());
    }

    #[test]
    fn test_input_not_mutated() {
        let raw = vec![bar(0, 100.0)];
        let actions = vec![CorporateAction {
            effective: DAY,
            factor: 0.5,
        }];

        let _ = adjust_for_actions(&raw, &actions).unwrap();
        assert_eq!(raw[0].close, 100.0);
    }
}
