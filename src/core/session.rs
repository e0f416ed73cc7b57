//! Trading session gate for intraday signal generation.
//!
//! Timestamps are nanoseconds since the Unix epoch in UTC. The session open
//! is a local time-of-day; `utc_offset_minutes` shifts timestamps into the
//! exchange's local clock before comparing.

use chrono::{DateTime, Duration, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use super::error::{Result, ZoneBtError};
use super::types::Timestamp;

/// Session configuration for signal generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Local time-of-day before which bars are ignored.
    pub session_start: NaiveTime,
    /// Offset of the exchange clock from UTC, in minutes.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl SessionConfig {
    /// Create a session starting at `hour:minute` local time.
    pub fn new(hour: u32, minute: u32, utc_offset_minutes: i32) -> Result<Self> {
        let session_start = NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| {
            ZoneBtError::configuration(format!("invalid session start {hour:02}:{minute:02}"))
        })?;
        Ok(Self {
            session_start,
            utc_offset_minutes,
        })
    }

    /// US cash equity open on standard time (09:30, UTC-5).
    ///
    /// The offset is fixed, so bars from March to November (daylight time)
    /// are gated an hour late; use [`SessionConfig::us_equity_edt`] there.
    pub fn us_equity_est() -> Self {
        Self::us_equity_at(-300)
    }

    /// US cash equity open on daylight time (09:30, UTC-4).
    pub fn us_equity_edt() -> Self {
        Self::us_equity_at(-240)
    }

    fn us_equity_at(utc_offset_minutes: i32) -> Self {
        Self {
            session_start: NaiveTime::from_hms_opt(9, 30, 0).unwrap_or_default(),
            utc_offset_minutes,
        }
    }

    /// Validate the offset range.
    pub fn validate(&self) -> Result<()> {
        if self.utc_offset_minutes.abs() >= 24 * 60 {
            return Err(ZoneBtError::configuration(format!(
                "utc_offset_minutes must be within +/-1439, got {}",
                self.utc_offset_minutes
            )));
        }
        Ok(())
    }

    /// Local time-of-day for a timestamp.
    pub fn local_time(&self, timestamp_ns: Timestamp) -> Option<NaiveTime> {
        let secs = timestamp_ns.div_euclid(1_000_000_000);
        let nanos = timestamp_ns.rem_euclid(1_000_000_000) as u32;
        let utc = DateTime::from_timestamp(secs, nanos)?;
        let local = utc.naive_utc() + Duration::minutes(self.utc_offset_minutes as i64);
        Some(local.time())
    }

    /// Minutes from local midnight for a timestamp.
    pub fn minutes_from_midnight(&self, timestamp_ns: Timestamp) -> Option<u32> {
        self.local_time(timestamp_ns).map(|t| t.hour() * 60 + t.minute())
    }

    /// Check whether a bar at this timestamp is at or after the session open.
    pub fn is_open(&self, timestamp_ns: Timestamp) -> bool {
        self.local_time(timestamp_ns)
            .map(|t| t >= self.session_start)
            .unwrap_or(false)
    }
}
