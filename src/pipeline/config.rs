//! Combined configuration for a full detection → signal → backtest run.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::backtest::BacktestConfig;
use crate::core::error::Result;
use crate::signals::SignalConfig;
use crate::zones::ZoneConfig;

/// Configuration of every pipeline stage.
///
/// Missing sections and fields take their defaults, so `{}` is a valid
/// config document:
///
/// ```json
/// {
///   "zones": { "window": 20, "min_touches": 2, "tolerance": 0.002 },
///   "signals": { "policy": "breakout", "session": { "session_start": "09:30:00" } },
///   "backtest": { "stop_loss_pct": 1.5, "take_profit_pct": 5.0 }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub zones: ZoneConfig,
    pub signals: SignalConfig,
    pub backtest: BacktestConfig,
}

impl PipelineConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;
        info!(path = %path.display(), "loaded pipeline config");
        Ok(config)
    }

    /// Validate every stage.
    pub fn validate(&self) -> Result<()> {
        self.zones.validate()?;
        self.signals.validate()?;
        self.backtest.validate()
    }
}
