//! End-to-end run: zones, then signals, then backtest.

pub mod config;

pub use config::PipelineConfig;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::backtest::BacktestEngine;
use crate::core::error::Result;
use crate::core::series::PriceSeries;
use crate::core::types::{BacktestResult, Signal, ZoneSet};
use crate::signals::SignalGenerator;
use crate::zones::ZoneDetector;

/// Outputs of every pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub zones: ZoneSet,
    pub signals: Vec<Signal>,
    pub backtest: BacktestResult,
}

/// Chains zone detection, signal generation and backtesting.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    detector: ZoneDetector,
    generator: SignalGenerator,
    engine: BacktestEngine,
}

impl Pipeline {
    /// Create a pipeline from a combined config.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            detector: ZoneDetector::new(config.zones),
            generator: SignalGenerator::new(config.signals),
            engine: BacktestEngine::new(config.backtest),
        }
    }

    /// Validate the config and build the pipeline.
    pub fn try_new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Run all three stages over `series`.
    pub fn run(&self, series: &PriceSeries) -> Result<PipelineOutput> {
        let zones = self.detector.detect(series)?;
        let signals = self.generator.generate(series, &zones)?;
        let backtest = self.engine.run(series, &signals)?;

        info!(
            bars = series.len(),
            support = zones.support.len(),
            resistance = zones.resistance.len(),
            signals = signals.len(),
            trades = backtest.trades.len(),
            total_return_pct = backtest.stats.total_return_pct,
            "pipeline run complete"
        );

        Ok(PipelineOutput {
            zones,
            signals,
            backtest,
        })
    }
}
