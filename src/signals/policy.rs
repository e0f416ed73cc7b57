//! Zone interaction policies.

use serde::{Deserialize, Serialize};

use crate::core::types::{Interaction, Price, Side};

/// Rule deciding when a bar's close interacts with a level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalPolicy {
    /// Close crosses a level between consecutive bars.
    ///
    /// Buy when the previous close was below a support and the current close
    /// is above it; Sell when the previous close was above a resistance and
    /// the current close is below it.
    #[default]
    Breakout,
    /// Close lands within `touch_tolerance` of a level.
    ///
    /// Buy on a support touch (bounce), Sell on a resistance touch
    /// (rejection).
    TouchBounce,
}

impl SignalPolicy {
    /// First level, in ascending order, that fires for `side` on this bar.
    ///
    /// Buy signals are matched against support levels and Sell signals
    /// against resistance levels.
    pub fn match_level(
        self,
        side: Side,
        prev_close: Price,
        close: Price,
        levels: &[Price],
        touch_tolerance: f64,
    ) -> Option<(Price, Interaction)> {
        match self {
            SignalPolicy::Breakout => levels
                .iter()
                .copied()
                .find(|&level| match side {
                    Side::Buy => prev_close < level && close > level,
                    Side::Sell => prev_close > level && close < level,
                })
                .map(|level| (level, Interaction::Breakout)),
            SignalPolicy::TouchBounce => {
                let interaction = match side {
                    Side::Buy => Interaction::Bounce,
                    Side::Sell => Interaction::Rejection,
                };
                levels
                    .iter()
                    .copied()
                    .find(|&level| (close - level).abs() / level < touch_tolerance)
                    .map(|level| (level, interaction))
            }
        }
    }
}
