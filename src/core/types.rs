//! Core data types for zonebt.

use serde::{Deserialize, Serialize};

/// Type alias for price values.
pub type Price = f64;

/// Type alias for timestamp values (nanoseconds since epoch).
pub type Timestamp = i64;

/// Side of a trade signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i8)]
pub enum Side {
    /// Buy to open, profits when price rises.
    Buy = 1,
    /// Sell to open, profits when price falls.
    Sell = -1,
}

impl Side {
    /// Convert side to multiplier for P&L calculations.
    #[inline]
    pub fn multiplier(self) -> f64 {
        self as i8 as f64
    }

    /// Create side from integer.
    pub fn from_int(value: i32) -> Option<Self> {
        match value {
            1 => Some(Side::Buy),
            -1 => Some(Side::Sell),
            _ => None,
        }
    }
}

/// OHLCV data for a single bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: Timestamp,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: Option<f64>,
}

/// A detected support or resistance price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Level price (mean of the clustered swing points).
    pub price: Price,
    /// Number of swing points clustered into this level.
    pub touches: usize,
}

impl Level {
    pub fn new(price: Price, touches: usize) -> Self {
        Self { price, touches }
    }
}

/// Detected support and resistance levels, each ascending by price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneSet {
    pub support: Vec<Level>,
    pub resistance: Vec<Level>,
}

impl ZoneSet {
    /// Check if no levels were found on either side.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.support.is_empty() && self.resistance.is_empty()
    }

    /// Support prices, ascending.
    pub fn support_prices(&self) -> Vec<Price> {
        self.support.iter().map(|l| l.price).collect()
    }

    /// Resistance prices, ascending.
    pub fn resistance_prices(&self) -> Vec<Price> {
        self.resistance.iter().map(|l| l.price).collect()
    }
}

/// Why a signal fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interaction {
    /// Close touched a support level.
    Bounce,
    /// Close crossed a level.
    Breakout,
    /// Close touched a resistance level.
    Rejection,
}

/// A trade instruction derived from a zone interaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// Timestamp of the emitting bar.
    pub timestamp: Timestamp,
    /// Index of the emitting bar in the source series.
    pub bar_idx: usize,
    /// Trade side.
    pub side: Side,
    /// Reference (entry) price, the close of the emitting bar.
    pub price: Price,
    /// Interaction classification.
    pub interaction: Interaction,
    /// Level that triggered the signal.
    pub level: Price,
}

/// Reason a trade was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExitReason {
    /// Stop-loss hit.
    StopLoss,
    /// Take-profit hit.
    TakeProfit,
    /// Neither hit inside the horizon; closed flat at the last scanned bar.
    ForcedClose,
}

/// A signal resolved by the backtest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    /// Trade identifier (position in resolution order).
    pub id: u64,
    /// Trade side.
    pub side: Side,
    /// Entry bar index.
    pub entry_idx: usize,
    /// Exit bar index.
    pub exit_idx: usize,
    /// Entry timestamp.
    pub entry_time: Timestamp,
    /// Exit timestamp.
    pub exit_time: Timestamp,
    /// Entry price.
    pub entry_price: Price,
    /// Stop-loss price.
    pub stop_price: Price,
    /// Take-profit price.
    pub target_price: Price,
    /// Price the trade was closed at.
    pub exit_price: Price,
    /// Percentage P&L (e.g. -1.5 for a 1.5% loss).
    pub pnl_pct: f64,
    /// Exit reason.
    pub exit_reason: ExitReason,
}

impl Trade {
    /// Check if trade was profitable.
    #[inline]
    pub fn is_winning(&self) -> bool {
        self.pnl_pct > 0.0
    }

    /// Get holding period in bars.
    #[inline]
    pub fn holding_period(&self) -> usize {
        self.exit_idx - self.entry_idx
    }
}

/// Summary statistics of a backtest run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BacktestStats {
    /// Starting equity.
    pub starting_equity: f64,
    /// Equity after the last resolved trade.
    pub final_equity: f64,
    /// Total return percentage.
    pub total_return_pct: f64,
    /// Number of resolved trades.
    pub total_trades: usize,
    /// Number of winning trades.
    pub winning_trades: usize,
    /// Number of losing trades.
    pub losing_trades: usize,
    /// Signals dropped because no exit triggered inside the horizon.
    pub skipped_signals: usize,
    /// Wins / total trades, as a fraction in [0, 1].
    pub win_rate: f64,
    /// Maximum peak-to-trough decline of the equity curve, in percent.
    pub max_drawdown_pct: f64,
}

impl BacktestStats {
    /// Win rate as a percentage.
    #[inline]
    pub fn win_rate_pct(&self) -> f64 {
        self.win_rate * 100.0
    }
}

/// Complete backtest result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Summary statistics.
    pub stats: BacktestStats,
    /// Starting equity followed by the equity after each resolved trade.
    pub equity_curve: Vec<f64>,
    /// Drawdown percentage at each equity curve point.
    pub drawdown_curve: Vec<f64>,
    /// Resolved trades in signal order.
    pub trades: Vec<Trade>,
}
