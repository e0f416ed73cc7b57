//! Signal-driven backtest engine.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::error::{Result, ZoneBtError};
use crate::core::series::PriceSeries;
use crate::core::types::{
    BacktestResult, BacktestStats, ExitReason, Price, Signal, Timestamp, Trade,
};
use crate::metrics::drawdown::DrawdownTracker;
use crate::stops::{FixedStop, FixedTarget, StopCalculator, TargetCalculator};

/// What to do with a signal whose stop and target both stay untouched
/// inside the scan horizon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoExitPolicy {
    /// Drop the signal; it is counted in `skipped_signals` only.
    #[default]
    Skip,
    /// Close flat at the last scanned bar's close with zero P&L.
    ForceClose,
}

/// Backtest configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    /// Stop-loss distance in percent of entry, below 100.
    pub stop_loss_pct: f64,
    /// Take-profit distance in percent of entry.
    pub take_profit_pct: f64,
    /// Initial account equity.
    pub starting_equity: f64,
    /// Bars scanned per signal, signal bar included.
    pub max_horizon_bars: usize,
    pub no_exit: NoExitPolicy,
    /// Share of equity exposed per trade, in (0, 1].
    pub position_fraction: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            stop_loss_pct: 1.5,
            take_profit_pct: 5.0,
            starting_equity: 10_000.0,
            max_horizon_bars: 100,
            no_exit: NoExitPolicy::Skip,
            position_fraction: 1.0,
        }
    }
}

impl BacktestConfig {
    /// Create a config with the given stop/target and default everything else.
    pub fn new(stop_loss_pct: f64, take_profit_pct: f64, starting_equity: f64) -> Self {
        Self {
            stop_loss_pct,
            take_profit_pct,
            starting_equity,
            ..Self::default()
        }
    }

    /// Set the no-exit policy.
    pub fn with_no_exit(mut self, no_exit: NoExitPolicy) -> Self {
        self.no_exit = no_exit;
        self
    }

    /// Set the scan horizon.
    pub fn with_max_horizon(mut self, bars: usize) -> Self {
        self.max_horizon_bars = bars;
        self
    }

    /// Validate parameter ranges.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("stop_loss_pct", self.stop_loss_pct),
            ("take_profit_pct", self.take_profit_pct),
            ("starting_equity", self.starting_equity),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ZoneBtError::configuration(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.stop_loss_pct >= 100.0 {
            return Err(ZoneBtError::configuration(format!(
                "stop_loss_pct must be below 100, got {}",
                self.stop_loss_pct
            )));
        }
        if self.max_horizon_bars == 0 {
            return Err(ZoneBtError::configuration("max_horizon_bars must be at least 1"));
        }
        if !(self.position_fraction > 0.0 && self.position_fraction <= 1.0) {
            return Err(ZoneBtError::configuration(format!(
                "position_fraction must be in (0, 1], got {}",
                self.position_fraction
            )));
        }
        Ok(())
    }
}

/// Where and why a scanned trade closed.
#[derive(Debug, Clone, Copy)]
struct Exit {
    idx: usize,
    price: Price,
    pnl_pct: f64,
    reason: ExitReason,
}

/// Replays signals against a price series with fixed stop/target exits.
///
/// Signals are independent: each is resolved on its own, and trades may
/// overlap in time. Equity compounds in signal timestamp order.
#[derive(Debug, Clone, Default)]
pub struct BacktestEngine {
    config: BacktestConfig,
}

impl BacktestEngine {
    /// Create a new backtest engine with the given configuration.
    pub fn new(config: BacktestConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    /// Run the backtest.
    ///
    /// Every signal timestamp must exist in `series`; otherwise the run fails
    /// with [`ZoneBtError::DataAlignment`] before any trade is simulated. The
    /// error counts distinct timestamps, not signals.
    pub fn run(&self, series: &PriceSeries, signals: &[Signal]) -> Result<BacktestResult> {
        self.config.validate()?;
        let cfg = &self.config;

        let mut located: Vec<(usize, &Signal)> = Vec::with_capacity(signals.len());
        let mut unmatched: HashSet<Timestamp> = HashSet::new();
        for signal in signals {
            match series.index_of(signal.timestamp) {
                Some(idx) => located.push((idx, signal)),
                None => {
                    unmatched.insert(signal.timestamp);
                }
            }
        }
        if !unmatched.is_empty() {
            let total = signals.iter().map(|s| s.timestamp).collect::<HashSet<_>>().len();
            return Err(ZoneBtError::data_alignment(unmatched.len(), total));
        }
        located.sort_by_key(|(_, s)| s.timestamp);

        let stop = FixedStop::new(cfg.stop_loss_pct);
        let target = FixedTarget::new(cfg.take_profit_pct);

        let mut equity = cfg.starting_equity;
        let mut equity_curve = Vec::with_capacity(located.len() + 1);
        equity_curve.push(equity);
        let mut drawdown = DrawdownTracker::new(equity);
        let mut drawdown_curve = Vec::with_capacity(located.len() + 1);
        drawdown_curve.push(0.0);

        let mut trades: Vec<Trade> = Vec::new();
        let mut skipped = 0usize;

        for (entry_idx, signal) in located {
            let entry_price = signal.price;
            let stop_price = stop.calculate_stop(entry_price, signal.side);
            let target_price = target.calculate_target(entry_price, signal.side);

            let Some(exit) =
                self.scan_exit(series, entry_idx, signal, stop_price, target_price, &stop, &target)
            else {
                skipped += 1;
                warn!(
                    timestamp = signal.timestamp,
                    side = ?signal.side,
                    horizon = cfg.max_horizon_bars,
                    "no exit inside horizon, signal skipped"
                );
                continue;
            };

            equity *= 1.0 + cfg.position_fraction * exit.pnl_pct / 100.0;
            equity_curve.push(equity);
            drawdown_curve.push(drawdown.update(equity));

            trades.push(Trade {
                id: trades.len() as u64,
                side: signal.side,
                entry_idx,
                exit_idx: exit.idx,
                entry_time: signal.timestamp,
                exit_time: series.timestamps()[exit.idx],
                entry_price,
                stop_price,
                target_price,
                exit_price: exit.price,
                pnl_pct: exit.pnl_pct,
                exit_reason: exit.reason,
            });
        }

        let total_trades = trades.len();
        let winning_trades = trades.iter().filter(|t| t.is_winning()).count();
        let losing_trades = trades.iter().filter(|t| t.pnl_pct < 0.0).count();
        let stats = BacktestStats {
            starting_equity: cfg.starting_equity,
            final_equity: equity,
            total_return_pct: (equity / cfg.starting_equity - 1.0) * 100.0,
            total_trades,
            winning_trades,
            losing_trades,
            skipped_signals: skipped,
            win_rate: if total_trades > 0 {
                winning_trades as f64 / total_trades as f64
            } else {
                0.0
            },
            max_drawdown_pct: drawdown.max_drawdown_pct(),
        };

        info!(
            trades = total_trades,
            skipped,
            final_equity = equity,
            win_rate = stats.win_rate,
            max_drawdown_pct = stats.max_drawdown_pct,
            "backtest complete"
        );

        Ok(BacktestResult {
            stats,
            equity_curve,
            drawdown_curve,
            trades,
        })
    }

    /// Walk bars from the signal bar forward until stop or target is hit.
    ///
    /// The stop is tested before the target on every bar, so a bar whose
    /// range spans both resolves as a loss.
    #[allow(clippy::too_many_arguments)]
    fn scan_exit(
        &self,
        series: &PriceSeries,
        entry_idx: usize,
        signal: &Signal,
        stop_price: Price,
        target_price: Price,
        stop: &FixedStop,
        target: &FixedTarget,
    ) -> Option<Exit> {
        let high = series.high();
        let low = series.low();
        let end = entry_idx
            .saturating_add(self.config.max_horizon_bars)
            .min(series.len());

        for i in entry_idx..end {
            if stop.is_hit(stop_price, high[i], low[i], signal.side) {
                return Some(Exit {
                    idx: i,
                    price: stop_price,
                    pnl_pct: -stop.pct,
                    reason: ExitReason::StopLoss,
                });
            }
            if target.is_hit(target_price, high[i], low[i], signal.side) {
                return Some(Exit {
                    idx: i,
                    price: target_price,
                    pnl_pct: target.pct,
                    reason: ExitReason::TakeProfit,
                });
            }
        }

        match self.config.no_exit {
            NoExitPolicy::Skip => None,
            NoExitPolicy::ForceClose => {
                let last = end.checked_sub(1)?;
                debug!(timestamp = signal.timestamp, exit_idx = last, "forced close");
                Some(Exit {
                    idx: last,
                    price: series.close()[last],
                    pnl_pct: 0.0,
                    reason: ExitReason::ForcedClose,
                })
            }
        }
    }
}

/// Run a backtest with fixed stop/target percentages and default horizon.
pub fn run_backtest(
    series: &PriceSeries,
    signals: &[Signal],
    stop_loss_pct: f64,
    take_profit_pct: f64,
    starting_equity: f64,
) -> Result<BacktestResult> {
    BacktestEngine::new(BacktestConfig::new(stop_loss_pct, take_profit_pct, starting_equity))
        .run(series, signals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Interaction, Side};

    /// Bars around 100 with the given lows/highs after the entry bar.
    fn series(highs: &[f64], lows: &[f64]) -> PriceSeries {
        let n = highs.len();
        let close: Vec<f64> = highs.iter().zip(lows).map(|(h, l)| (h + l) / 2.0).collect();
        PriceSeries::new(
            (0..n as i64).collect(),
            close.clone(),
            highs.to_vec(),
            lows.to_vec(),
            close,
            None,
        )
        .unwrap()
    }

    fn signal(timestamp: i64, side: Side, price: f64) -> Signal {
        Signal {
            timestamp,
            bar_idx: timestamp as usize,
            side,
            price,
            interaction: Interaction::Breakout,
            level: price,
        }
    }

    #[test]
    fn test_buy_stop_loss() {
        let s = series(&[100.5, 101.0], &[99.5, 97.0]);
        let result = run_backtest(&s, &[signal(0, Side::Buy, 100.0)], 2.0, 5.0, 10_000.0).unwrap();

        assert_eq!(result.trades.len(), 1);
        let trade = &result.trades[0];
        assert_eq!(trade.exit_reason, ExitReason::StopLoss);
        assert_eq!(trade.exit_idx, 1);
        assert!((trade.pnl_pct + 2.0).abs() < 1e-10);
        assert!((result.stats.final_equity - 9_800.0).abs() < 1e-9);
        assert_eq!(result.stats.win_rate, 0.0);
    }

    #[test]
    fn test_sell_take_profit() {
        let s = series(&[100.5, 100.0, 96.0], &[99.5, 98.0, 94.0]);
        let result = run_backtest(&s, &[signal(0, Side::Sell, 100.0)], 2.0, 5.0, 10_000.0).unwrap();

        let trade = &result.trades[0];
        assert_eq!(trade.exit_reason, ExitReason::TakeProfit);
        assert!((trade.exit_price - 95.0).abs() < 1e-10);
        assert!((result.stats.final_equity - 10_500.0).abs() < 1e-9);
        assert_eq!(result.stats.win_rate, 1.0);
    }

    #[test]
    fn test_stop_checked_before_target() {
        let s = series(&[100.5, 106.0], &[99.5, 97.0]);
        let result = run_backtest(&s, &[signal(0, Side::Buy, 100.0)], 2.0, 5.0, 10_000.0).unwrap();
        assert_eq!(result.trades[0].exit_reason, ExitReason::StopLoss);
    }

    #[test]
    fn test_sell_stop_checked_before_target() {
        let s = series(&[100.5, 103.0], &[99.5, 94.0]);
        let result = run_backtest(&s, &[signal(0, Side::Sell, 100.0)], 2.0, 5.0, 10_000.0).unwrap();

        let trade = &result.trades[0];
        assert_eq!(trade.exit_reason, ExitReason::StopLoss);
        assert_eq!(trade.exit_idx, 1);
        assert!((trade.exit_price - 102.0).abs() < 1e-10);
        assert!((trade.pnl_pct + 2.0).abs() < 1e-10);
        assert!((result.stats.final_equity - 9_800.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_exit_skipped_by_default() {
        let s = series(&[100.5, 100.5], &[99.5, 99.5]);
        let result = run_backtest(&s, &[signal(0, Side::Buy, 100.0)], 2.0, 5.0, 10_000.0).unwrap();

        assert!(result.trades.is_empty());
        assert_eq!(result.stats.skipped_signals, 1);
        assert_eq!(result.equity_curve, vec![10_000.0]);
    }

    #[test]
    fn test_no_exit_force_close() {
        let s = series(&[100.5, 100.5, 101.0], &[99.5, 99.5, 100.0]);
        let config = BacktestConfig::new(2.0, 5.0, 10_000.0)
            .with_no_exit(NoExitPolicy::ForceClose)
            .with_max_horizon(2);
        let result = BacktestEngine::new(config)
            .run(&s, &[signal(0, Side::Buy, 100.0)])
            .unwrap();

        let trade = &result.trades[0];
        assert_eq!(trade.exit_reason, ExitReason::ForcedClose);
        assert_eq!(trade.exit_idx, 1);
        assert_eq!(trade.pnl_pct, 0.0);
        assert_eq!(result.equity_curve, vec![10_000.0, 10_000.0]);
    }

    #[test]
    fn test_horizon_bounds_scan() {
        let s = series(&[100.5, 100.5, 100.5, 100.5], &[99.5, 99.5, 99.5, 90.0]);
        let config = BacktestConfig::new(2.0, 5.0, 10_000.0).with_max_horizon(3);
        let result = BacktestEngine::new(config)
            .run(&s, &[signal(0, Side::Buy, 100.0)])
            .unwrap();
        assert!(result.trades.is_empty());
    }

    #[test]
    fn test_signals_sorted_before_compounding() {
        let s = series(&[100.5, 100.5, 100.5, 106.0], &[99.5, 99.5, 97.0, 99.0]);
        let signals = vec![signal(1, Side::Buy, 100.0), signal(0, Side::Sell, 100.0)];
        let result = run_backtest(&s, &signals, 2.0, 5.0, 10_000.0).unwrap();

        assert_eq!(result.trades[0].side, Side::Sell);
        assert_eq!(result.trades[1].side, Side::Buy);
        assert_eq!(result.equity_curve.len(), 3);
    }

    #[test]
    fn test_position_fraction_scales_pnl() {
        let s = series(&[100.5, 101.0], &[99.5, 97.0]);
        let config = BacktestConfig {
            position_fraction: 0.5,
            ..BacktestConfig::new(2.0, 5.0, 10_000.0)
        };
        let result = BacktestEngine::new(config)
            .run(&s, &[signal(0, Side::Buy, 100.0)])
            .unwrap();
        assert!((result.stats.final_equity - 9_900.0).abs() < 1e-9);
    }

    #[test]
    fn test_unmatched_timestamps() {
        let s = series(&[100.5, 101.0], &[99.5, 97.0]);
        let signals = vec![signal(0, Side::Buy, 100.0), signal(7, Side::Buy, 100.0)];
        let err = run_backtest(&s, &signals, 2.0, 5.0, 10_000.0).unwrap_err();
        assert!(matches!(err, ZoneBtError::DataAlignment { unmatched: 1, total: 2 }));
    }

    #[test]
    fn test_unmatched_counts_distinct_timestamps() {
        let s = series(&[100.5, 101.0], &[99.5, 97.0]);
        let signals = vec![
            signal(1, Side::Buy, 100.0),
            signal(7, Side::Buy, 100.0),
            signal(7, Side::Sell, 100.0),
        ];
        let err = run_backtest(&s, &signals, 2.0, 5.0, 10_000.0).unwrap_err();
        assert!(matches!(err, ZoneBtError::DataAlignment { unmatched: 1, total: 2 }));
    }

    #[test]
    fn test_invalid_config() {
        let s = series(&[100.5], &[99.5]);
        assert!(run_backtest(&s, &[], 0.0, 5.0, 10_000.0).is_err());
        assert!(run_backtest(&s, &[], 2.0, -1.0, 10_000.0).is_err());
        assert!(run_backtest(&s, &[], 2.0, 5.0, 0.0).is_err());
        assert!(run_backtest(&s, &[], 100.0, 5.0, 10_000.0).is_err());
        assert!(run_backtest(&s, &[], 150.0, 5.0, 10_000.0).is_err());
        assert!(run_backtest(&s, &[], 99.5, 5.0, 10_000.0).is_ok());
    }
}
