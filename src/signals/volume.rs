//! Volume confirmation filter.

use crate::core::error::Result;
use crate::indicators::rolling::rolling_mean;

/// Passes a bar only when its volume beats the average of the bars before it.
#[derive(Debug, Clone)]
pub struct VolumeFilter<'a> {
    volume: &'a [f64],
    /// Trailing mean ending at each index (inclusive).
    mean: Vec<f64>,
    period: usize,
}

impl<'a> VolumeFilter<'a> {
    /// Create a filter over `volume` averaging `period` prior bars.
    pub fn new(volume: &'a [f64], period: usize) -> Result<Self> {
        let mean = rolling_mean(volume, period)?;
        Ok(Self { volume, mean, period })
    }

    /// Check whether `volume[idx]` exceeds the mean of `volume[idx - period..idx]`.
    ///
    /// Bars with fewer than `period` prior bars never pass.
    pub fn passes(&self, idx: usize) -> bool {
        if idx < self.period || idx >= self.volume.len() {
            return false;
        }
        let prior_mean = self.mean[idx - 1];
        !prior_mean.is_nan() && self.volume[idx] > prior_mean
    }
}
