//! Performance metrics for backtest results.

pub mod drawdown;
pub mod trade_stats;

pub use drawdown::{calculate_drawdown_curve, drawdown_periods, max_drawdown, DrawdownTracker};
pub use trade_stats::{stats_by_exit_reason, stats_by_side, TradeStatistics};
