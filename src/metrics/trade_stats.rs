//! Per-trade statistics over percentage P&L.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::types::{ExitReason, Side, Trade};

/// Aggregate statistics of a set of trades.
///
/// All P&L figures are in percent of entry price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeStatistics {
    /// Total number of trades.
    pub total_trades: usize,
    /// Number of winning trades.
    pub winning_trades: usize,
    /// Number of losing trades.
    pub losing_trades: usize,
    /// Number of flat trades.
    pub breakeven_trades: usize,
    /// Win rate (as percentage).
    pub win_rate: f64,
    /// Mean P&L of winners.
    pub avg_win_pct: f64,
    /// Mean absolute P&L of losers.
    pub avg_loss_pct: f64,
    pub largest_win_pct: f64,
    pub largest_loss_pct: f64,
    /// Sum of winning P&L.
    pub gross_profit_pct: f64,
    /// Sum of absolute losing P&L.
    pub gross_loss_pct: f64,
    /// Gross profit over gross loss.
    pub profit_factor: f64,
    /// Mean P&L per trade.
    pub expectancy_pct: f64,
    /// Average holding period (bars).
    pub avg_holding_period: f64,
    pub max_consecutive_wins: usize,
    pub max_consecutive_losses: usize,
    /// Average win over average loss.
    pub payoff_ratio: f64,
}

impl TradeStatistics {
    /// Calculate statistics from a list of trades.
    pub fn from_trades<'a, I>(trades: I) -> Self
    where
        I: IntoIterator<Item = &'a Trade>,
    {
        let mut stats = Self::default();
        let mut net = 0.0;
        let mut holding = 0usize;
        let mut win_streak = 0usize;
        let mut loss_streak = 0usize;

        for trade in trades {
            let pnl = trade.pnl_pct;
            stats.total_trades += 1;
            net += pnl;
            holding += trade.holding_period();

            if pnl > 0.0 {
                stats.winning_trades += 1;
                stats.gross_profit_pct += pnl;
                stats.largest_win_pct = stats.largest_win_pct.max(pnl);
                win_streak += 1;
                loss_streak = 0;
            } else if pnl < 0.0 {
                stats.losing_trades += 1;
                stats.gross_loss_pct += pnl.abs();
                stats.largest_loss_pct = stats.largest_loss_pct.max(pnl.abs());
                loss_streak += 1;
                win_streak = 0;
            } else {
                stats.breakeven_trades += 1;
            }
            stats.max_consecutive_wins = stats.max_consecutive_wins.max(win_streak);
            stats.max_consecutive_losses = stats.max_consecutive_losses.max(loss_streak);
        }

        if stats.total_trades == 0 {
            return stats;
        }

        let total = stats.total_trades as f64;
        stats.win_rate = stats.winning_trades as f64 / total * 100.0;
        stats.expectancy_pct = net / total;
        stats.avg_holding_period = holding as f64 / total;

        if stats.winning_trades > 0 {
            stats.avg_win_pct = stats.gross_profit_pct / stats.winning_trades as f64;
        }
        if stats.losing_trades > 0 {
            stats.avg_loss_pct = stats.gross_loss_pct / stats.losing_trades as f64;
        }

        if stats.gross_loss_pct > 0.0 {
            stats.profit_factor = stats.gross_profit_pct / stats.gross_loss_pct;
        } else if stats.gross_profit_pct > 0.0 {
            stats.profit_factor = f64::INFINITY;
        }

        if stats.avg_loss_pct > 0.0 {
            stats.payoff_ratio = stats.avg_win_pct / stats.avg_loss_pct;
        }

        stats
    }

    /// Net P&L across all trades, in percent points.
    pub fn net_pct(&self) -> f64 {
        self.gross_profit_pct - self.gross_loss_pct
    }

    /// Get summary as formatted string.
    pub fn summary(&self) -> String {
        format!(
            "Trades: {} | Win Rate: {:.1}% | Profit Factor: {:.2} | Expectancy: {:.3}%",
            self.total_trades, self.win_rate, self.profit_factor, self.expectancy_pct
        )
    }
}

/// Statistics grouped by exit reason.
pub fn stats_by_exit_reason(trades: &[Trade]) -> HashMap<ExitReason, TradeStatistics> {
    let mut grouped: HashMap<ExitReason, Vec<&Trade>> = HashMap::new();
    for trade in trades {
        grouped.entry(trade.exit_reason).or_default().push(trade);
    }

    grouped
        .into_iter()
        .map(|(reason, group)| (reason, TradeStatistics::from_trades(group)))
        .collect()
}

/// Statistics for Buy and Sell trades, in that order.
pub fn stats_by_side(trades: &[Trade]) -> (TradeStatistics, TradeStatistics) {
    (
        TradeStatistics::from_trades(trades.iter().filter(|t| t.side == Side::Buy)),
        TradeStatistics::from_trades(trades.iter().filter(|t| t.side == Side::Sell)),
    )
}
