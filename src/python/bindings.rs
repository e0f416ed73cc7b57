//! PyO3 function bindings for zonebt.

use chrono::NaiveTime;
use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::backtest::{BacktestConfig, BacktestEngine, NoExitPolicy};
use crate::core::session::SessionConfig;
use crate::core::types::{
    BacktestResult, BacktestStats, ExitReason, Interaction, Signal, Trade, ZoneSet,
};
use crate::logging;
use crate::signals::{SignalConfig, SignalGenerator, SignalPolicy};
use crate::zones::{ZoneConfig, ZoneDetector};

use super::numpy_bridge::*;

// ============================================================================
// Result Classes
// ============================================================================

/// Python-exposed zone set.
#[pyclass]
#[derive(Debug, Clone)]
pub struct PyZoneSet {
    inner: ZoneSet,
}

#[pymethods]
impl PyZoneSet {
    /// Support prices, ascending, as numpy array.
    fn support<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        vec_to_numpy_f64(py, self.inner.support_prices())
    }

    /// Resistance prices, ascending, as numpy array.
    fn resistance<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        vec_to_numpy_f64(py, self.inner.resistance_prices())
    }

    /// Swing points clustered into each support level.
    fn support_touches(&self) -> Vec<usize> {
        self.inner.support.iter().map(|l| l.touches).collect()
    }

    /// Swing points clustered into each resistance level.
    fn resistance_touches(&self) -> Vec<usize> {
        self.inner.resistance.iter().map(|l| l.touches).collect()
    }

    fn __len__(&self) -> usize {
        self.inner.support.len() + self.inner.resistance.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "ZoneSet(support={:?}, resistance={:?})",
            self.inner.support_prices(),
            self.inner.resistance_prices()
        )
    }
}

/// Python-exposed signal.
#[pyclass]
#[derive(Debug, Clone)]
pub struct PySignal {
    inner: Signal,
}

#[pymethods]
impl PySignal {
    #[getter]
    fn timestamp(&self) -> i64 {
        self.inner.timestamp
    }

    #[getter]
    fn bar_idx(&self) -> usize {
        self.inner.bar_idx
    }

    /// 1 for Buy, -1 for Sell.
    #[getter]
    fn side(&self) -> i32 {
        self.inner.side as i32
    }

    #[getter]
    fn price(&self) -> f64 {
        self.inner.price
    }

    #[getter]
    fn level(&self) -> f64 {
        self.inner.level
    }

    #[getter]
    fn interaction(&self) -> &'static str {
        interaction_name(self.inner.interaction)
    }

    fn __repr__(&self) -> String {
        format!(
            "Signal(ts={}, side={}, price={:.4}, level={:.4}, {})",
            self.inner.timestamp,
            self.side(),
            self.inner.price,
            self.inner.level,
            self.interaction()
        )
    }
}

/// Python-exposed trade.
#[pyclass]
#[derive(Debug, Clone)]
pub struct PyTrade {
    #[pyo3(get)]
    pub id: u64,
    #[pyo3(get)]
    pub side: i32,
    #[pyo3(get)]
    pub entry_idx: usize,
    #[pyo3(get)]
    pub exit_idx: usize,
    #[pyo3(get)]
    pub entry_time: i64,
    #[pyo3(get)]
    pub exit_time: i64,
    #[pyo3(get)]
    pub entry_price: f64,
    #[pyo3(get)]
    pub stop_price: f64,
    #[pyo3(get)]
    pub target_price: f64,
    #[pyo3(get)]
    pub exit_price: f64,
    #[pyo3(get)]
    pub pnl_pct: f64,
    #[pyo3(get)]
    pub exit_reason: String,
}

#[pymethods]
impl PyTrade {
    fn __repr__(&self) -> String {
        format!(
            "Trade(side={}, entry={:.2}, exit={:.2}, pnl={:.2}%, {})",
            self.side, self.entry_price, self.exit_price, self.pnl_pct, self.exit_reason
        )
    }
}

impl From<Trade> for PyTrade {
    fn from(t: Trade) -> Self {
        Self {
            id: t.id,
            side: t.side as i32,
            entry_idx: t.entry_idx,
            exit_idx: t.exit_idx,
            entry_time: t.entry_time,
            exit_time: t.exit_time,
            entry_price: t.entry_price,
            stop_price: t.stop_price,
            target_price: t.target_price,
            exit_price: t.exit_price,
            pnl_pct: t.pnl_pct,
            exit_reason: exit_reason_name(t.exit_reason).to_string(),
        }
    }
}

/// Python-exposed backtest statistics.
#[pyclass]
#[derive(Debug, Clone)]
pub struct PyBacktestStats {
    #[pyo3(get)]
    pub starting_equity: f64,
    #[pyo3(get)]
    pub final_equity: f64,
    #[pyo3(get)]
    pub total_return_pct: f64,
    #[pyo3(get)]
    pub total_trades: usize,
    #[pyo3(get)]
    pub winning_trades: usize,
    #[pyo3(get)]
    pub losing_trades: usize,
    #[pyo3(get)]
    pub skipped_signals: usize,
    #[pyo3(get)]
    pub win_rate: f64,
    #[pyo3(get)]
    pub max_drawdown_pct: f64,
}

#[pymethods]
impl PyBacktestStats {
    fn __repr__(&self) -> String {
        format!(
            "BacktestStats(final={:.2}, return={:.2}%, trades={}, win_rate={:.1}%, max_dd={:.2}%)",
            self.final_equity,
            self.total_return_pct,
            self.total_trades,
            self.win_rate * 100.0,
            self.max_drawdown_pct
        )
    }

    /// Convert to dictionary for dashboard display.
    fn to_dict(&self, py: Python) -> PyResult<PyObject> {
        let dict = pyo3::types::PyDict::new(py);
        dict.set_item("Start Value", self.starting_equity)?;
        dict.set_item("End Value", self.final_equity)?;
        dict.set_item("Total Return [%]", self.total_return_pct)?;
        dict.set_item("Total Trades", self.total_trades)?;
        dict.set_item("Winning Trades", self.winning_trades)?;
        dict.set_item("Losing Trades", self.losing_trades)?;
        dict.set_item("Skipped Signals", self.skipped_signals)?;
        dict.set_item("Win Rate [%]", self.win_rate * 100.0)?;
        dict.set_item("Max Drawdown [%]", self.max_drawdown_pct)?;
        Ok(dict.into())
    }
}

impl From<BacktestStats> for PyBacktestStats {
    fn from(s: BacktestStats) -> Self {
        Self {
            starting_equity: s.starting_equity,
            final_equity: s.final_equity,
            total_return_pct: s.total_return_pct,
            total_trades: s.total_trades,
            winning_trades: s.winning_trades,
            losing_trades: s.losing_trades,
            skipped_signals: s.skipped_signals,
            win_rate: s.win_rate,
            max_drawdown_pct: s.max_drawdown_pct,
        }
    }
}

/// Python-exposed backtest result.
#[pyclass]
#[derive(Debug, Clone)]
pub struct PyBacktestResult {
    #[pyo3(get)]
    pub stats: PyBacktestStats,
    equity_curve: Vec<f64>,
    drawdown_curve: Vec<f64>,
    trades: Vec<PyTrade>,
}

#[pymethods]
impl PyBacktestResult {
    /// Get equity curve as numpy array.
    fn equity_curve<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        vec_to_numpy_f64(py, self.equity_curve.clone())
    }

    /// Get drawdown curve as numpy array.
    fn drawdown_curve<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        vec_to_numpy_f64(py, self.drawdown_curve.clone())
    }

    /// Exit timestamps of resolved trades as numpy array.
    fn exit_times<'py>(&self, py: Python<'py>) -> &'py PyArray1<i64> {
        vec_to_numpy_i64(py, self.trades.iter().map(|t| t.exit_time).collect())
    }

    /// Get list of trades.
    fn trades(&self) -> Vec<PyTrade> {
        self.trades.clone()
    }

    fn __repr__(&self) -> String {
        format!(
            "BacktestResult(return={:.2}%, trades={}, max_dd={:.2}%)",
            self.stats.total_return_pct, self.stats.total_trades, self.stats.max_drawdown_pct
        )
    }
}

impl From<BacktestResult> for PyBacktestResult {
    fn from(result: BacktestResult) -> Self {
        Self {
            stats: result.stats.into(),
            equity_curve: result.equity_curve,
            drawdown_curve: result.drawdown_curve,
            trades: result.trades.into_iter().map(PyTrade::from).collect(),
        }
    }
}

// ============================================================================
// Pipeline Functions
// ============================================================================

/// Detect support and resistance levels.
#[pyfunction]
#[pyo3(signature = (timestamps, open, high, low, close, window=20, min_touches=2, tolerance=0.002, max_levels=None))]
#[allow(clippy::too_many_arguments)]
pub fn detect_zones(
    timestamps: PyReadonlyArray1<i64>,
    open: PyReadonlyArray1<f64>,
    high: PyReadonlyArray1<f64>,
    low: PyReadonlyArray1<f64>,
    close: PyReadonlyArray1<f64>,
    window: usize,
    min_touches: usize,
    tolerance: f64,
    max_levels: Option<usize>,
) -> PyResult<PyZoneSet> {
    let series = series_from_numpy(timestamps, open, high, low, close, None)?;
    let config = ZoneConfig {
        max_levels,
        ..ZoneConfig::new(window, min_touches, tolerance)
    };
    let zones = ZoneDetector::new(config).detect(&series)?;
    Ok(PyZoneSet { inner: zones })
}

/// Generate signals from zone interactions.
///
/// `session_start` is a local time such as `"09:30"`; bars before it are
/// ignored.
#[pyfunction]
#[pyo3(signature = (timestamps, open, high, low, close, zones, volume=None, use_volume=false, policy="breakout", session_start=None, utc_offset_minutes=0, cooldown_bars=0))]
#[allow(clippy::too_many_arguments)]
pub fn generate_signals(
    timestamps: PyReadonlyArray1<i64>,
    open: PyReadonlyArray1<f64>,
    high: PyReadonlyArray1<f64>,
    low: PyReadonlyArray1<f64>,
    close: PyReadonlyArray1<f64>,
    zones: &PyZoneSet,
    volume: Option<PyReadonlyArray1<f64>>,
    use_volume: bool,
    policy: &str,
    session_start: Option<&str>,
    utc_offset_minutes: i32,
    cooldown_bars: usize,
) -> PyResult<Vec<PySignal>> {
    let series = series_from_numpy(timestamps, open, high, low, close, volume)?;

    let session = session_start
        .map(|s| parse_session(s, utc_offset_minutes))
        .transpose()?;
    let config = SignalConfig {
        policy: parse_policy(policy)?,
        use_volume,
        session,
        cooldown_bars,
        ..SignalConfig::default()
    };

    let signals = SignalGenerator::new(config).generate(&series, &zones.inner)?;
    Ok(signals.into_iter().map(|inner| PySignal { inner }).collect())
}

/// Backtest signals with fixed stop-loss and take-profit.
#[pyfunction]
#[pyo3(signature = (timestamps, open, high, low, close, signals, stop_loss_pct=1.5, take_profit_pct=5.0, starting_equity=10000.0, max_horizon_bars=100, force_close=false))]
#[allow(clippy::too_many_arguments)]
pub fn run_backtest(
    timestamps: PyReadonlyArray1<i64>,
    open: PyReadonlyArray1<f64>,
    high: PyReadonlyArray1<f64>,
    low: PyReadonlyArray1<f64>,
    close: PyReadonlyArray1<f64>,
    signals: Vec<PySignal>,
    stop_loss_pct: f64,
    take_profit_pct: f64,
    starting_equity: f64,
    max_horizon_bars: usize,
    force_close: bool,
) -> PyResult<PyBacktestResult> {
    let series = series_from_numpy(timestamps, open, high, low, close, None)?;
    let signals: Vec<Signal> = signals.into_iter().map(|s| s.inner).collect();

    let no_exit = if force_close {
        NoExitPolicy::ForceClose
    } else {
        NoExitPolicy::Skip
    };
    let config = BacktestConfig::new(stop_loss_pct, take_profit_pct, starting_equity)
        .with_max_horizon(max_horizon_bars)
        .with_no_exit(no_exit);

    let result = BacktestEngine::new(config).run(&series, &signals)?;
    Ok(result.into())
}

/// Install the stderr log subscriber. Returns False if one was already set.
#[pyfunction]
#[pyo3(signature = (filter=None))]
pub fn init_logging(filter: Option<&str>) -> bool {
    logging::init_tracing(filter)
}

// ============================================================================
// Helpers
// ============================================================================

fn parse_policy(name: &str) -> PyResult<SignalPolicy> {
    match name.to_ascii_lowercase().as_str() {
        "breakout" => Ok(SignalPolicy::Breakout),
        "touch_bounce" | "touch" | "bounce" => Ok(SignalPolicy::TouchBounce),
        other => Err(PyValueError::new_err(format!(
            "Invalid policy: {other}. Use 'breakout' or 'touch_bounce'"
        ))),
    }
}

fn parse_session(start: &str, utc_offset_minutes: i32) -> PyResult<SessionConfig> {
    let session_start = NaiveTime::parse_from_str(start, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(start, "%H:%M"))
        .map_err(|e| PyValueError::new_err(format!("Invalid session_start '{start}': {e}")))?;
    let session = SessionConfig {
        session_start,
        utc_offset_minutes,
    };
    session.validate()?;
    Ok(session)
}

fn interaction_name(interaction: Interaction) -> &'static str {
    match interaction {
        Interaction::Bounce => "bounce",
        Interaction::Breakout => "breakout",
        Interaction::Rejection => "rejection",
    }
}

fn exit_reason_name(reason: ExitReason) -> &'static str {
    match reason {
        ExitReason::StopLoss => "stop_loss",
        ExitReason::TakeProfit => "take_profit",
        ExitReason::ForcedClose => "forced_close",
    }
}
