//! Fixed percentage stop-loss and take-profit.
//!
//! Percentages are given in percent units: 1.5 means 1.5%.

use super::{StopCalculator, TargetCalculator};
use crate::core::types::{Price, Side};

/// Fixed percentage stop-loss.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedStop {
    /// Stop distance in percent of entry.
    pub pct: f64,
}

impl FixedStop {
    /// Create a new fixed stop with given percentage.
    pub fn new(pct: f64) -> Self {
        Self { pct: pct.abs() }
    }
}

impl StopCalculator for FixedStop {
    fn calculate_stop(&self, entry_price: Price, side: Side) -> Price {
        match side {
            Side::Buy => entry_price * (1.0 - self.pct / 100.0),
            Side::Sell => entry_price * (1.0 + self.pct / 100.0),
        }
    }
}

/// Fixed percentage take-profit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedTarget {
    /// Target distance in percent of entry.
    pub pct: f64,
}

impl FixedTarget {
    /// Create a new fixed target with given percentage.
    pub fn new(pct: f64) -> Self {
        Self { pct: pct.abs() }
    }
}

impl TargetCalculator for FixedTarget {
    fn calculate_target(&self, entry_price: Price, side: Side) -> Price {
        match side {
            Side::Buy => entry_price * (1.0 + self.pct / 100.0),
            Side::Sell => entry_price * (1.0 - self.pct / 100.0),
        }
    }
}
