//! Stop-loss and take-profit price calculation.

pub mod fixed;

pub use fixed::{FixedStop, FixedTarget};

use crate::core::types::{Price, Side};

/// Stop-loss calculator trait.
pub trait StopCalculator {
    /// Calculate stop price for a new position.
    fn calculate_stop(&self, entry_price: Price, side: Side) -> Price;

    /// Whether a bar's range reaches the stop.
    fn is_hit(&self, stop_price: Price, high: Price, low: Price, side: Side) -> bool {
        match side {
            Side::Buy => low <= stop_price,
            Side::Sell => high >= stop_price,
        }
    }
}

/// Take-profit calculator trait.
pub trait TargetCalculator {
    /// Calculate target price for a new position.
    fn calculate_target(&self, entry_price: Price, side: Side) -> Price;

    /// Whether a bar's range reaches the target.
    fn is_hit(&self, target_price: Price, high: Price, low: Price, side: Side) -> bool {
        match side {
            Side::Buy => high >= target_price,
            Side::Sell => low <= target_price,
        }
    }
}
