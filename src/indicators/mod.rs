//! Window indicators used by zone detection and signal filters.
//!
//! Indicators are pure functions that take slice inputs and return Vec
//! outputs. NaN values are used for the warmup period.

pub mod rolling;

pub use rolling::{rolling_max, rolling_mean, rolling_min};
