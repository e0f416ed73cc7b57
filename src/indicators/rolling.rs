//! Trailing-window min/max/mean.
//!
//! Each output value at index `i` covers `data[i + 1 - period..=i]`. The
//! first `period - 1` values are NaN where the window is incomplete.

use crate::core::error::{Result, ZoneBtError};

fn check_period(period: usize) -> Result<()> {
    if period == 0 {
        return Err(ZoneBtError::configuration("period must be at least 1"));
    }
    Ok(())
}

/// Extreme of each trailing window under `keep_first(candidate, current)`.
///
/// NaN inputs are skipped; a window holding only NaN yields NaN.
fn rolling_extreme(
    data: &[f64],
    period: usize,
    keep_first: impl Fn(f64, f64) -> bool,
) -> Result<Vec<f64>> {
    check_period(period)?;

    let mut result = vec![f64::NAN; data.len()];
    for (offset, window) in data.windows(period).enumerate() {
        result[offset + period - 1] = window
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .reduce(|best, v| if keep_first(v, best) { v } else { best })
            .unwrap_or(f64::NAN);
    }

    Ok(result)
}

/// Rolling minimum (lowest low) over a period.
pub fn rolling_min(data: &[f64], period: usize) -> Result<Vec<f64>> {
    rolling_extreme(data, period, |v, best| v < best)
}

/// Rolling maximum (highest high) over a period.
pub fn rolling_max(data: &[f64], period: usize) -> Result<Vec<f64>> {
    rolling_extreme(data, period, |v, best| v > best)
}

/// Simple moving average over a period, using a running sum.
pub fn rolling_mean(data: &[f64], period: usize) -> Result<Vec<f64>> {
    check_period(period)?;

    let n = data.len();
    let mut result = vec![f64::NAN; n];
    if period > n {
        return Ok(result);
    }

    let mut sum: f64 = data[..period].iter().sum();
    result[period - 1] = sum / period as f64;

    for i in period..n {
        sum = sum - data[i - period] + data[i];
        result[i] = sum / period as f64;
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_min() {
        let data = vec![5.0, 3.0, 8.0, 2.0, 7.0, 1.0, 9.0];
        let result = rolling_min(&data, 3).unwrap();

        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert!((result[2] - 3.0).abs() < f64::EPSILON); // min(5, 3, 8)
        assert!((result[3] - 2.0).abs() < f64::EPSILON); // min(3, 8, 2)
        assert!((result[5] - 1.0).abs() < f64::EPSILON); // min(2, 7, 1)
        assert!((result[6] - 1.0).abs() < f64::EPSILON); // min(7, 1, 9)
    }

    #[test]
    fn test_rolling_max() {
        let data = vec![5.0, 3.0, 8.0, 2.0, 7.0, 1.0, 9.0];
        let result = rolling_max(&data, 3).unwrap();

        assert!(result[1].is_nan());
        assert!((result[2] - 8.0).abs() < f64::EPSILON); // max(5, 3, 8)
        assert!((result[4] - 8.0).abs() < f64::EPSILON); // max(8, 2, 7)
        assert!((result[5] - 7.0).abs() < f64::EPSILON); // max(2, 7, 1)
        assert!((result[6] - 9.0).abs() < f64::EPSILON); // max(7, 1, 9)
    }

    #[test]
    fn test_rolling_mean() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = rolling_mean(&data, 3).unwrap();
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert!((result[2] - 2.0).abs() < 1e-10);
        assert!((result[4] - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_period_longer_than_data() {
        let result = rolling_mean(&[1.0, 2.0], 5).unwrap();
        assert!(result.iter().all(|v| v.is_nan()));
        assert!(rolling_max(&[1.0, 2.0], 5).unwrap().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_invalid_period() {
        let data = vec![1.0, 2.0, 3.0];
        assert!(rolling_min(&data, 0).is_err());
        assert!(rolling_max(&data, 0).is_err());
        assert!(rolling_mean(&data, 0).is_err());
    }
}
