//! Backtesting of zone signals with fixed stop/target exits.

pub mod engine;
pub mod sweep;

pub use engine::{run_backtest, BacktestConfig, BacktestEngine, NoExitPolicy};
pub use sweep::{best_by_final_equity, run_grid, SweepPoint};
