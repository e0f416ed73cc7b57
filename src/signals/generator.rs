//! Zone interaction signal generation.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::policy::SignalPolicy;
use super::processor::{dedup_levels, SignalProcessor};
use super::volume::VolumeFilter;
use crate::core::error::{Result, ZoneBtError};
use crate::core::series::PriceSeries;
use crate::core::session::SessionConfig;
use crate::core::types::{Side, Signal, ZoneSet};

/// Signal generation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Interaction rule.
    pub policy: SignalPolicy,
    /// Require volume above its trailing average.
    pub use_volume: bool,
    /// Number of prior bars averaged by the volume filter.
    pub volume_period: usize,
    /// Ignore bars before the session open.
    pub session: Option<SessionConfig>,
    /// Levels closer than this (relative) collapse to one before scanning.
    pub level_dedup_tolerance: f64,
    /// Relative distance counted as a touch by [`SignalPolicy::TouchBounce`].
    pub touch_tolerance: f64,
    /// Suppress a like same-side signal for this many bars (0 disables).
    pub cooldown_bars: usize,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            policy: SignalPolicy::Breakout,
            use_volume: false,
            volume_period: 20,
            session: None,
            level_dedup_tolerance: 0.002,
            touch_tolerance: 0.001,
            cooldown_bars: 0,
        }
    }
}

impl SignalConfig {
    /// Set the interaction policy.
    pub fn with_policy(mut self, policy: SignalPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Enable or disable the volume filter.
    pub fn with_volume(mut self, use_volume: bool) -> Self {
        self.use_volume = use_volume;
        self
    }

    /// Gate signals by a session open.
    pub fn with_session(mut self, session: SessionConfig) -> Self {
        self.session = Some(session);
        self
    }

    /// Validate parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if self.volume_period == 0 {
            return Err(ZoneBtError::configuration("volume_period must be at least 1"));
        }
        for (name, value) in [
            ("level_dedup_tolerance", self.level_dedup_tolerance),
            ("touch_tolerance", self.touch_tolerance),
        ] {
            if !(value >= 0.0 && value < 1.0) {
                return Err(ZoneBtError::configuration(format!(
                    "{name} must be in [0, 1), got {value}"
                )));
            }
        }
        if let Some(session) = &self.session {
            session.validate()?;
        }
        Ok(())
    }
}

/// Emits trade signals from price interactions with detected zones.
#[derive(Debug, Clone, Default)]
pub struct SignalGenerator {
    config: SignalConfig,
}

impl SignalGenerator {
    /// Create a new generator.
    pub fn new(config: SignalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    /// Scan the series from bar 1 and emit signals in timestamp order.
    ///
    /// An empty series or empty zone set gives no signals. Requesting the
    /// volume filter on a series without volume is a configuration error.
    pub fn generate(&self, series: &PriceSeries, zones: &ZoneSet) -> Result<Vec<Signal>> {
        self.config.validate()?;
        let cfg = &self.config;

        if series.len() < 2 || zones.is_empty() {
            return Ok(Vec::new());
        }

        let volume_filter = if cfg.use_volume {
            let volume = series.volume().ok_or_else(|| {
                ZoneBtError::configuration("volume filter requested but series has no volume")
            })?;
            Some(VolumeFilter::new(volume, cfg.volume_period)?)
        } else {
            None
        };

        let support = dedup_levels(&zones.support_prices(), cfg.level_dedup_tolerance);
        let resistance = dedup_levels(&zones.resistance_prices(), cfg.level_dedup_tolerance);
        debug!(
            support = support.len(),
            resistance = resistance.len(),
            policy = ?cfg.policy,
            "scanning levels"
        );

        let timestamps = series.timestamps();
        let close = series.close();
        let mut processor = SignalProcessor::new(cfg.touch_tolerance, cfg.cooldown_bars);
        let mut volume_rejected = 0usize;

        for i in 1..series.len() {
            if let Some(session) = &cfg.session {
                if !session.is_open(timestamps[i]) {
                    continue;
                }
            }

            for (side, levels) in [(Side::Buy, &support), (Side::Sell, &resistance)] {
                let Some((level, interaction)) = cfg.policy.match_level(
                    side,
                    close[i - 1],
                    close[i],
                    levels,
                    cfg.touch_tolerance,
                ) else {
                    continue;
                };

                if let Some(filter) = &volume_filter {
                    if !filter.passes(i) {
                        volume_rejected += 1;
                        continue;
                    }
                }

                processor.push(Signal {
                    timestamp: timestamps[i],
                    bar_idx: i,
                    side,
                    price: close[i],
                    interaction,
                    level,
                });
            }
        }

        let suppressed = processor.suppressed();
        let signals = processor.finish();
        info!(
            signals = signals.len(),
            volume_rejected,
            suppressed,
            "signals generated"
        );
        Ok(signals)
    }
}

/// Generate signals with the canonical breakout policy.
pub fn generate_signals(
    series: &PriceSeries,
    zones: &ZoneSet,
    use_volume: bool,
    session_start: Option<SessionConfig>,
) -> Result<Vec<Signal>> {
    let config = SignalConfig {
        use_volume,
        session: session_start,
        ..SignalConfig::default()
    };
    SignalGenerator::new(config).generate(series, zones)
}
