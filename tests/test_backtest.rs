//! Integration tests for zonebt backtest engine and pipeline.

use zonebt::backtest::{run_backtest, run_grid, BacktestConfig, BacktestEngine, NoExitPolicy};
use zonebt::core::series::PriceSeries;
use zonebt::core::types::{ExitReason, Interaction, Side, Signal};
use zonebt::metrics::{max_drawdown, stats_by_side, TradeStatistics};
use zonebt::pipeline::{Pipeline, PipelineConfig};
use zonebt::ZoneBtError;

fn sample_series() -> PriceSeries {
    // Entry bar at 100, then a dip, then a rally.
    let open = vec![100.0, 100.0, 98.0, 101.0, 104.0, 106.0];
    let high = vec![100.5, 100.2, 99.0, 104.5, 106.0, 107.0];
    let low = vec![99.5, 97.0, 96.5, 100.5, 103.0, 105.0];
    let close = vec![100.0, 98.0, 97.0, 104.0, 105.5, 106.5];
    PriceSeries::new((0..6).collect(), open, high, low, close, None).unwrap()
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
fn test_buy_stopped_out_next_bar() {
    let series = sample_series();
    let result = run_backtest(&series, &[signal(0, Side::Buy, 100.0)], 2.0, 5.0, 10_000.0).unwrap();

    assert_eq!(result.trades.len(), 1);
    let trade = &result.trades[0];
    assert_eq!(trade.exit_reason, ExitReason::StopLoss);
    assert_eq!(trade.exit_idx, 1);
    assert!((trade.pnl_pct + 2.0).abs() < 1e-10);
    assert!((trade.stop_price - 98.0).abs() < 1e-10);
    assert!((trade.target_price - 105.0).abs() < 1e-10);

    assert!((result.stats.final_equity - 9_800.0).abs() < 1e-9);
    assert!((result.stats.total_return_pct + 2.0).abs() < 1e-9);
    assert!((result.stats.max_drawdown_pct - 2.0).abs() < 1e-9);
    assert_eq!(result.equity_curve.len(), 2);
}

#[test]
fn test_wider_stop_reaches_target() {
    let series = sample_series();
    let result = run_backtest(&series, &[signal(0, Side::Buy, 100.0)], 4.0, 5.0, 10_000.0).unwrap();

    let trade = &result.trades[0];
    assert_eq!(trade.exit_reason, ExitReason::TakeProfit);
    assert_eq!(trade.exit_idx, 4);
    assert!((result.stats.final_equity - 10_500.0).abs() < 1e-9);
    assert_eq!(result.stats.win_rate, 1.0);
    assert_eq!(result.stats.max_drawdown_pct, 0.0);
}

#[test]
fn test_compounding_and_drawdown() {
    let series = sample_series();
    let signals = vec![signal(0, Side::Buy, 100.0), signal(2, Side::Buy, 97.0)];
    let result = run_backtest(&series, &signals, 2.0, 2.0, 10_000.0).unwrap();

    // Loss then win: 10000 * 0.98 * 1.02.
    assert_eq!(result.trades.len(), 2);
    assert!((result.stats.final_equity - 9_996.0).abs() < 1e-9);
    assert!((result.stats.win_rate - 0.5).abs() < 1e-12);
    assert_eq!(result.drawdown_curve.len(), result.equity_curve.len());
    assert!((result.stats.max_drawdown_pct - max_drawdown(&result.equity_curve)).abs() < 1e-12);
}

#[test]
fn test_empty_signals() {
    let series = sample_series();
    let result = run_backtest(&series, &[], 2.0, 5.0, 10_000.0).unwrap();

    assert_eq!(result.equity_curve, vec![10_000.0]);
    assert_eq!(result.drawdown_curve, vec![0.0]);
    assert_eq!(result.stats.total_trades, 0);
    assert_eq!(result.stats.win_rate, 0.0);
    assert_eq!(result.stats.final_equity, 10_000.0);
    assert_eq!(result.stats.max_drawdown_pct, 0.0);
}

#[test]
fn test_misaligned_signals() {
    let series = sample_series();
    let signals = vec![
        signal(0, Side::Buy, 100.0),
        signal(100, Side::Buy, 100.0),
        signal(200, Side::Sell, 100.0),
    ];
    let err = run_backtest(&series, &signals, 2.0, 5.0, 10_000.0).unwrap_err();
    assert!(matches!(
        err,
        ZoneBtError::DataAlignment {
            unmatched: 2,
            total: 3
        }
    ));
}

#[test]
fn test_skip_versus_force_close() {
    let series = sample_series();
    let signals = [signal(4, Side::Sell, 105.5)];

    // Stop 107.61 and target 100.225 both stay untouched to the end.
    let skip = run_backtest(&series, &signals, 2.0, 5.0, 10_000.0).unwrap();
    assert!(skip.trades.is_empty());
    assert_eq!(skip.stats.skipped_signals, 1);

    let config =
        BacktestConfig::new(2.0, 5.0, 10_000.0).with_no_exit(NoExitPolicy::ForceClose);
    let forced = BacktestEngine::new(config).run(&series, &signals).unwrap();
    assert_eq!(forced.trades.len(), 1);
    assert_eq!(forced.trades[0].exit_reason, ExitReason::ForcedClose);
    assert_eq!(forced.trades[0].exit_idx, 5);
    assert_eq!(forced.trades[0].exit_price, 106.5);
    assert_eq!(forced.stats.final_equity, 10_000.0);
}

#[test]
fn test_trade_statistics_from_result() {
    let series = sample_series();
    let signals = vec![
        signal(0, Side::Buy, 100.0),
        signal(1, Side::Sell, 98.0),
        signal(3, Side::Buy, 104.0),
    ];
    let result = run_backtest(&series, &signals, 2.0, 2.0, 10_000.0).unwrap();
    let stats = TradeStatistics::from_trades(&result.trades);
    let (buys, sells) = stats_by_side(&result.trades);

    assert_eq!(stats.total_trades, result.stats.total_trades);
    assert_eq!(stats.winning_trades, result.stats.winning_trades);
    assert_eq!(buys.total_trades + sells.total_trades, stats.total_trades);
}

#[test]
fn test_sweep_matches_single_runs() {
    let series = sample_series();
    let signals = vec![signal(0, Side::Buy, 100.0)];
    let points = run_grid(
        &series,
        &signals,
        &BacktestConfig::default(),
        &[2.0, 4.0],
        &[5.0],
    )
    .unwrap();

    for point in &points {
        let single = run_backtest(
            &series,
            &signals,
            point.stop_loss_pct,
            point.take_profit_pct,
            10_000.0,
        )
        .unwrap();
        assert_eq!(point.stats, single.stats);
    }
}

#[test]
fn test_pipeline_end_to_end() {
    let n = 400;
    let close: Vec<f64> = (0..n)
        .map(|i| 110.0 + 10.0 * (2.0 * std::f64::consts::PI * i as f64 / 60.0).cos())
        .collect();
    let series = PriceSeries::new(
        (0..n as i64).map(|i| i * 60_000_000_000).collect(),
        close.clone(),
        close.iter().map(|c| c + 0.5).collect(),
        close.iter().map(|c| c - 0.5).collect(),
        close,
        None,
    )
    .unwrap();

    let config = PipelineConfig::from_json_str(
        r#"{
            "zones": { "window": 10, "min_touches": 3 },
            "signals": { "policy": "touch_bounce", "touch_tolerance": 0.01 },
            "backtest": { "stop_loss_pct": 1.0, "take_profit_pct": 5.0 }
        }"#,
    )
    .unwrap();
    let output = Pipeline::new(config).run(&series).unwrap();

    assert!(!output.zones.support.is_empty());
    assert!(!output.signals.is_empty());

    let bt = &output.backtest;
    assert_eq!(bt.equity_curve.len(), bt.trades.len() + 1);
    assert_eq!(bt.trades.len() + bt.stats.skipped_signals, output.signals.len());
    assert_eq!(bt.equity_curve.last().copied(), Some(bt.stats.final_equity));
    for trade in &bt.trades {
        assert!(trade.exit_idx >= trade.entry_idx);
        assert!(trade.exit_idx - trade.entry_idx < 100);
    }
}
