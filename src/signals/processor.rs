//! Signal de-duplication.
//!
//! Removes repeated signals as they are emitted so the output never holds
//! two signals with the same (timestamp, side), and optionally suppresses
//! same-side signals at nearly the same price within a cooldown of bars.

use std::collections::HashSet;

use crate::core::types::{Price, Side, Signal, Timestamp};

/// Collects signals in scan order and drops duplicates.
#[derive(Debug, Clone)]
pub struct SignalProcessor {
    /// Relative price distance under which two same-side signals are alike.
    price_tolerance: f64,
    /// Bars during which a like signal is suppressed (0 disables).
    cooldown_bars: usize,
    seen: HashSet<(Timestamp, Side)>,
    signals: Vec<Signal>,
    suppressed: usize,
}

impl Default for SignalProcessor {
    fn default() -> Self {
        Self::new(0.001, 0)
    }
}

impl SignalProcessor {
    /// Create a new signal processor.
    pub fn new(price_tolerance: f64, cooldown_bars: usize) -> Self {
        Self {
            price_tolerance,
            cooldown_bars,
            seen: HashSet::new(),
            signals: Vec::new(),
            suppressed: 0,
        }
    }

    /// Offer a signal. Returns `true` if it was kept.
    pub fn push(&mut self, signal: Signal) -> bool {
        if self.seen.contains(&(signal.timestamp, signal.side))
            || self.in_cooldown(signal.side, signal.bar_idx, signal.price)
        {
            self.suppressed += 1;
            return false;
        }
        self.seen.insert((signal.timestamp, signal.side));
        self.signals.push(signal);
        true
    }

    fn in_cooldown(&self, side: Side, bar_idx: usize, price: Price) -> bool {
        if self.cooldown_bars == 0 {
            return false;
        }
        self.signals
            .iter()
            .rev()
            .take_while(|s| s.bar_idx.saturating_add(self.cooldown_bars) > bar_idx)
            .any(|s| s.side == side && (price - s.price).abs() / s.price < self.price_tolerance)
    }

    /// Number of signals dropped so far.
    pub fn suppressed(&self) -> usize {
        self.suppressed
    }

    /// Kept signals, in the order they were pushed.
    pub fn finish(self) -> Vec<Signal> {
        self.signals
    }
}

/// Drop levels within `tolerance` of the previously kept level.
///
/// Levels are walked in ascending order and the first of each tight group is
/// kept as its representative.
pub fn dedup_levels(levels: &[Price], tolerance: f64) -> Vec<Price> {
    let mut sorted: Vec<Price> = levels.iter().copied().filter(|p| *p > 0.0).collect();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mut kept: Vec<Price> = Vec::with_capacity(sorted.len());
    for level in sorted {
        match kept.last() {
            Some(&last) if (level - last).abs() / last < tolerance => {}
            _ => kept.push(level),
        }
    }
    kept
}

/// Remove signals sharing (timestamp, side), keeping the first.
pub fn dedup_signals(signals: &[Signal]) -> Vec<Signal> {
    let mut processor = SignalProcessor::new(0.0, 0);
    for signal in signals {
        processor.push(*signal);
    }
    processor.finish()
}
