//! Local swing high/low detection.

use crate::core::error::Result;
use crate::core::series::PriceSeries;
use crate::core::types::Price;
use crate::indicators::rolling::{rolling_max, rolling_min};

/// A bar whose high (or low) is the extreme of its surrounding window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwingPoint {
    /// Bar index.
    pub idx: usize,
    /// Extreme price (the bar's high or low).
    pub price: Price,
}

/// Swing highs and lows in bar order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwingPoints {
    pub highs: Vec<SwingPoint>,
    pub lows: Vec<SwingPoint>,
}

/// Find swing highs and lows with a centered window of half-width `window`.
///
/// Bar `i` is a swing high when `high[i]` equals the maximum high over
/// `[i - window, i + window]`, and a swing low symmetrically on lows. Only
/// bars with a complete window on both sides qualify, so a series shorter
/// than `2 * window + 1` yields no points. Equal extremes inside one window
/// are all reported.
pub fn find_swing_points(series: &PriceSeries, window: usize) -> Result<SwingPoints> {
    let n = series.len();
    let mut points = SwingPoints::default();

    let span = match window.checked_mul(2).and_then(|w| w.checked_add(1)) {
        Some(span) if span <= n => span,
        _ => return Ok(points),
    };

    // Trailing windows ending at i + window are centered on i.
    let max_high = rolling_max(series.high(), span)?;
    let min_low = rolling_min(series.low(), span)?;
    let high = series.high();
    let low = series.low();

    for i in window..(n - window) {
        if high[i] == max_high[i + window] {
            points.highs.push(SwingPoint { idx: i, price: high[i] });
        }
        if low[i] == min_low[i + window] {
            points.lows.push(SwingPoint { idx: i, price: low[i] });
        }
    }

    Ok(points)
}
