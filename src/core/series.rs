//! Column-oriented OHLCV price series.

use super::error::{Result, ZoneBtError};
use super::types::{Bar, Price, Timestamp};

/// Ordered, index-addressable OHLCV data.
///
/// Timestamps are strictly increasing. The volume column is optional as a
/// whole: a series either carries volume for every bar or for none.
#[derive(Debug, Clone, Default)]
pub struct PriceSeries {
    timestamps: Vec<Timestamp>,
    open: Vec<Price>,
    high: Vec<Price>,
    low: Vec<Price>,
    close: Vec<Price>,
    volume: Option<Vec<f64>>,
}

impl PriceSeries {
    /// Create a series from columns, checking lengths and timestamp order.
    pub fn new(
        timestamps: Vec<Timestamp>,
        open: Vec<Price>,
        high: Vec<Price>,
        low: Vec<Price>,
        close: Vec<Price>,
        volume: Option<Vec<f64>>,
    ) -> Result<Self> {
        let n = timestamps.len();
        let columns =
            [("open", open.len()), ("high", high.len()), ("low", low.len()), ("close", close.len())];
        for (name, len) in columns {
            if len != n {
                return Err(ZoneBtError::input_shape(format!(
                    "column '{name}' has {len} values, expected {n}"
                )));
            }
        }
        if let Some(ref v) = volume {
            if v.len() != n {
                return Err(ZoneBtError::input_shape(format!(
                    "column 'volume' has {} values, expected {n}",
                    v.len()
                )));
            }
        }
        if let Some(pos) = timestamps.windows(2).position(|w| w[1] <= w[0]) {
            return Err(ZoneBtError::input_shape(format!(
                "timestamps must be strictly increasing (violation at index {})",
                pos + 1
            )));
        }

        Ok(Self {
            timestamps,
            open,
            high,
            low,
            close,
            volume,
        })
    }

    /// Create a series from bars. Volume is kept only if every bar has it.
    pub fn from_bars(bars: &[Bar]) -> Result<Self> {
        let volume = if bars.iter().all(|b| b.volume.is_some()) && !bars.is_empty() {
            Some(bars.iter().filter_map(|b| b.volume).collect())
        } else {
            None
        };

        Self::new(
            bars.iter().map(|b| b.timestamp).collect(),
            bars.iter().map(|b| b.open).collect(),
            bars.iter().map(|b| b.high).collect(),
            bars.iter().map(|b| b.low).collect(),
            bars.iter().map(|b| b.close).collect(),
            volume,
        )
    }

    /// Get the number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.close.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }

    #[inline]
    pub fn timestamps(&self) -> &[Timestamp] {
        &self.timestamps
    }

    #[inline]
    pub fn open(&self) -> &[Price] {
        &self.open
    }

    #[inline]
    pub fn high(&self) -> &[Price] {
        &self.high
    }

    #[inline]
    pub fn low(&self) -> &[Price] {
        &self.low
    }

    #[inline]
    pub fn close(&self) -> &[Price] {
        &self.close
    }

    /// Volume column, if the series carries one.
    #[inline]
    pub fn volume(&self) -> Option<&[f64]> {
        self.volume.as_deref()
    }

    /// Get a single bar at index.
    pub fn get_bar(&self, index: usize) -> Option<Bar> {
        if index >= self.len() {
            return None;
        }
        Some(Bar {
            timestamp: self.timestamps[index],
            open: self.open[index],
            high: self.high[index],
            low: self.low[index],
            close: self.close[index],
            volume: self.volume.as_ref().map(|v| v[index]),
        })
    }

    /// Locate the bar index holding `timestamp`.
    #[inline]
    pub fn index_of(&self, timestamp: Timestamp) -> Option<usize> {
        self.timestamps.binary_search(&timestamp).ok()
    }

    /// Iterator over bars.
    pub fn bars(&self) -> impl Iterator<Item = Bar> + '_ {
        (0..self.len()).filter_map(move |i| self.get_bar(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(ts: i64, close: f64, volume: Option<f64>) -> Bar {
        Bar {
            timestamp: ts,
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume,
        }
    }

    #[test]
    fn test_from_bars_keeps_volume() {
        let series =
            PriceSeries::from_bars(&[bar(1, 100.0, Some(10.0)), bar(2, 101.0, Some(20.0))])
                .unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.volume(), Some(&[10.0, 20.0][..]));
        assert_eq!(series.get_bar(1).unwrap().high, 102.0);
        assert!(series.get_bar(2).is_none());
    }

    #[test]
    fn test_partial_volume_dropped() {
        let series =
            PriceSeries::from_bars(&[bar(1, 100.0, Some(10.0)), bar(2, 101.0, None)]).unwrap();
        assert!(series.volume().is_none());
    }

    #[test]
    fn test_length_mismatch() {
        let err = PriceSeries::new(
            vec![1, 2],
            vec![1.0],
            vec![1.0, 1.0],
            vec![1.0, 1.0],
            vec![1.0, 1.0],
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ZoneBtError::InputShape { .. }));
    }

    #[test]
    fn test_unsorted_timestamps_rejected() {
        let err = PriceSeries::from_bars(&[bar(5, 100.0, None), bar(5, 101.0, None)]).unwrap_err();
        assert!(err.to_string().contains("strictly increasing"));
    }

    #[test]
    fn test_index_of() {
        let series =
            PriceSeries::from_bars(&[bar(10, 1.0, None), bar(20, 2.0, None), bar(30, 3.0, None)])
                .unwrap();
        assert_eq!(series.index_of(20), Some(1));
        assert_eq!(series.index_of(25), None);
    }

    #[test]
    fn test_empty_series() {
        let series = PriceSeries::from_bars(&[]).unwrap();
        assert!(series.is_empty());
        assert!(series.volume().is_none());
    }
}
