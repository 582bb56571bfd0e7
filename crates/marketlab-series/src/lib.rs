//! OHLCV series validation.
//!
//! Turns raw bar records from the data-acquisition collaborator into a
//! validated [`BarSeries`]: integrity checks, calendar-gap handling, and
//! corporate-action adjustment. Everything downstream (indicators, blender,
//! simulator) assumes its input went through this crate.

mod adjust;
mod validator;

pub use adjust::{adjust_for_actions, CorporateAction};
pub use validator::{drop_incomplete, GapPolicy, SeriesValidator};
