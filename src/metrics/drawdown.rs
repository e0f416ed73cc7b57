//! Drawdown of an equity curve.
//!
//! Drawdown at a point is `(running_peak - value) / running_peak`, reported
//! in percent. The running peak starts at the first value of the curve.

/// Incremental drawdown tracker fed one equity value at a time.
#[derive(Debug, Clone)]
pub struct DrawdownTracker {
    peak: f64,
    current: f64,
    max: f64,
    /// Points since the last new peak.
    duration: usize,
    max_duration: usize,
}

impl DrawdownTracker {
    /// Start tracking from an initial equity value.
    pub fn new(initial_value: f64) -> Self {
        Self {
            peak: initial_value,
            current: 0.0,
            max: 0.0,
            duration: 0,
            max_duration: 0,
        }
    }

    /// Feed the next equity value and return its drawdown in percent.
    pub fn update(&mut self, value: f64) -> f64 {
        if value >= self.peak {
            self.peak = value;
            self.current = 0.0;
            self.duration = 0;
        } else {
            self.current = if self.peak > 0.0 { (self.peak - value) / self.peak } else { 0.0 };
            self.duration += 1;
            self.max = self.max.max(self.current);
            self.max_duration = self.max_duration.max(self.duration);
        }
        self.current * 100.0
    }

    /// Current drawdown in percent.
    #[inline]
    pub fn current_drawdown_pct(&self) -> f64 {
        self.current * 100.0
    }

    /// Maximum drawdown seen so far in percent.
    #[inline]
    pub fn max_drawdown_pct(&self) -> f64 {
        self.max * 100.0
    }

    /// Highest value seen so far.
    #[inline]
    pub fn peak(&self) -> f64 {
        self.peak
    }

    /// Longest run of points below a prior peak.
    #[inline]
    pub fn max_duration(&self) -> usize {
        self.max_duration
    }
}

/// Drawdown percentage at each point of an equity curve.
pub fn calculate_drawdown_curve(equity_curve: &[f64]) -> Vec<f64> {
    let Some(&first) = equity_curve.first() else {
        return Vec::new();
    };

    let mut tracker = DrawdownTracker::new(first);
    equity_curve.iter().map(|&v| tracker.update(v)).collect()
}

/// Maximum drawdown of an equity curve in percent (0 for empty curves).
pub fn max_drawdown(equity_curve: &[f64]) -> f64 {
    calculate_drawdown_curve(equity_curve)
        .into_iter()
        .fold(0.0f64, f64::max)
}

/// Drawdown periods as `(peak_idx, last_idx, max_drawdown_pct)`.
///
/// A period opens at the peak preceding the first decline and closes at the
/// point before a new peak, or at the end of the curve.
pub fn drawdown_periods(equity_curve: &[f64]) -> Vec<(usize, usize, f64)> {
    let mut periods = Vec::new();
    let Some(&first) = equity_curve.first() else {
        return periods;
    };

    let mut peak = first;
    let mut peak_idx = 0;
    let mut open: Option<(usize, f64)> = None;

    for (i, &value) in equity_curve.iter().enumerate().skip(1) {
        if value > peak {
            if let Some((start, worst)) = open.take() {
                periods.push((start, i - 1, worst));
            }
            peak = value;
            peak_idx = i;
        } else if value < peak && peak > 0.0 {
            let dd = (peak - value) / peak * 100.0;
            let entry = open.get_or_insert((peak_idx, 0.0));
            entry.1 = entry.1.max(dd);
        }
    }

    if let Some((start, worst)) = open {
        periods.push((start, equity_curve.len() - 1, worst));
    }
    periods
}
