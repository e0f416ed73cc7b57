//! Stop/target grid search.
//!
//! Each grid cell is an independent backtest over the same signals, so the
//! grid is evaluated in parallel via Rayon.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::engine::{BacktestConfig, BacktestEngine};
use crate::core::error::{Result, ZoneBtError};
use crate::core::series::PriceSeries;
use crate::core::types::{BacktestStats, Signal};

/// Result of one stop/target combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub stop_loss_pct: f64,
    pub take_profit_pct: f64,
    pub stats: BacktestStats,
}

/// Backtest every `(stop, target)` pair of the two grids.
///
/// Points are returned in grid order: stops outer, targets inner. Fields of
/// `base_config` other than the stop and target apply to every run. The first
/// failing combination aborts the sweep.
pub fn run_grid(
    series: &PriceSeries,
    signals: &[Signal],
    base_config: &BacktestConfig,
    stop_loss_grid: &[f64],
    take_profit_grid: &[f64],
) -> Result<Vec<SweepPoint>> {
    if stop_loss_grid.is_empty() || take_profit_grid.is_empty() {
        return Err(ZoneBtError::configuration("sweep grids must not be empty"));
    }

    let cells: Vec<(f64, f64)> = stop_loss_grid
        .iter()
        .flat_map(|&sl| take_profit_grid.iter().map(move |&tp| (sl, tp)))
        .collect();

    let points = cells
        .into_par_iter()
        .map(|(stop_loss_pct, take_profit_pct)| {
            let config = BacktestConfig {
                stop_loss_pct,
                take_profit_pct,
                ..base_config.clone()
            };
            let result = BacktestEngine::new(config).run(series, signals)?;
            Ok(SweepPoint {
                stop_loss_pct,
                take_profit_pct,
                stats: result.stats,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    info!(
        points = points.len(),
        signals = signals.len(),
        "parameter sweep complete"
    );
    Ok(points)
}

/// Point with the highest final equity; ties keep the earliest in grid order.
pub fn best_by_final_equity(points: &[SweepPoint]) -> Option<&SweepPoint> {
    points.iter().fold(None, |best: Option<&SweepPoint>, p| match best {
        Some(b) if b.stats.final_equity >= p.stats.final_equity => Some(b),
        _ => Some(p),
    })
}
