//! Support/resistance zone detection.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::cluster::{cluster_levels, enforce_separation};
use super::swing::find_swing_points;
use crate::core::error::{Result, ZoneBtError};
use crate::core::series::PriceSeries;
use crate::core::types::{Level, ZoneSet};

/// Zone detection configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneConfig {
    /// Half-width, in bars, of the swing extremum window.
    pub window: usize,
    /// Minimum swing points a cluster needs to become a level.
    pub min_touches: usize,
    /// Relative clustering tolerance (0.002 = 0.2%).
    pub tolerance: f64,
    /// Keep only this many lowest supports and highest resistances.
    pub max_levels: Option<usize>,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            window: 20,
            min_touches: 2,
            tolerance: 0.002,
            max_levels: None,
        }
    }
}

impl ZoneConfig {
    /// Create a config with explicit detection parameters.
    pub fn new(window: usize, min_touches: usize, tolerance: f64) -> Self {
        Self {
            window,
            min_touches,
            tolerance,
            max_levels: None,
        }
    }

    /// Limit the number of levels reported per side.
    pub fn with_max_levels(mut self, max_levels: usize) -> Self {
        self.max_levels = Some(max_levels);
        self
    }

    /// Validate parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if self.window == 0 {
            return Err(ZoneBtError::configuration("window must be at least 1"));
        }
        if self.min_touches == 0 {
            return Err(ZoneBtError::configuration("min_touches must be at least 1"));
        }
        if !(self.tolerance > 0.0 && self.tolerance < 1.0) {
            return Err(ZoneBtError::configuration(format!(
                "tolerance must be in (0, 1), got {}",
                self.tolerance
            )));
        }
        if self.max_levels == Some(0) {
            return Err(ZoneBtError::configuration("max_levels must be at least 1"));
        }
        Ok(())
    }
}

/// Detects support and resistance levels from swing points.
#[derive(Debug, Clone, Default)]
pub struct ZoneDetector {
    config: ZoneConfig,
}

impl ZoneDetector {
    /// Create a new detector.
    pub fn new(config: ZoneConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ZoneConfig {
        &self.config
    }

    /// Detect zones in a price series.
    ///
    /// Swing highs feed resistance clustering and swing lows feed support
    /// clustering. Too-short series and series with no cluster reaching
    /// `min_touches` produce an empty [`ZoneSet`].
    pub fn detect(&self, series: &PriceSeries) -> Result<ZoneSet> {
        self.config.validate()?;
        let cfg = &self.config;

        let swings = find_swing_points(series, cfg.window)?;
        debug!(
            bars = series.len(),
            swing_highs = swings.highs.len(),
            swing_lows = swings.lows.len(),
            "swing points found"
        );

        let highs: Vec<f64> = swings.highs.iter().map(|p| p.price).collect();
        let lows: Vec<f64> = swings.lows.iter().map(|p| p.price).collect();

        let mut support = enforce_separation(
            cluster_levels(&lows, cfg.tolerance, cfg.min_touches),
            cfg.tolerance,
        );
        let mut resistance = enforce_separation(
            cluster_levels(&highs, cfg.tolerance, cfg.min_touches),
            cfg.tolerance,
        );

        if let Some(max) = cfg.max_levels {
            support.truncate(max);
            keep_last(&mut resistance, max);
        }

        info!(
            support = support.len(),
            resistance = resistance.len(),
            "zones detected"
        );

        Ok(ZoneSet { support, resistance })
    }
}

fn keep_last(levels: &mut Vec<Level>, max: usize) {
    if levels.len() > max {
        levels.drain(..levels.len() - max);
    }
}

/// Detect zones with explicit parameters.
pub fn detect_zones(
    series: &PriceSeries,
    window: usize,
    min_touches: usize,
    tolerance: f64,
) -> Result<ZoneSet> {
    ZoneDetector::new(ZoneConfig::new(window, min_touches, tolerance)).detect(series)
}
