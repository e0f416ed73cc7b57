// Suppress warning from PyO3 macro expansion (fixed in newer PyO3 versions)
#![cfg_attr(feature = "python", allow(non_local_definitions))]

//! zonebt - support/resistance zone detection and signal backtesting.
//!
//! The crate runs a three-stage pipeline over an OHLC(V) bar series:
//! - Zone detection: swing highs/lows clustered into price levels
//! - Signal generation: breakout or touch interactions with those levels
//! - Backtesting: fixed percentage stop-loss / take-profit per signal
//!
//! Each stage is usable on its own or chained through [`pipeline::Pipeline`].

pub mod backtest;
pub mod core;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod pipeline;
#[cfg(feature = "python")]
pub mod python;
pub mod signals;
pub mod stops;
pub mod zones;

pub use crate::backtest::{run_backtest, BacktestConfig, BacktestEngine, NoExitPolicy};
pub use crate::core::{PriceSeries, Result, SessionConfig, ZoneBtError};
pub use crate::pipeline::{Pipeline, PipelineConfig, PipelineOutput};
pub use crate::signals::{generate_signals, SignalConfig, SignalGenerator, SignalPolicy};
pub use crate::zones::{detect_zones, ZoneConfig, ZoneDetector};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Python module entry point
#[cfg(feature = "python")]
#[pymodule]
fn _zonebt(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    // Register result classes
    m.add_class::<python::bindings::PyZoneSet>()?;
    m.add_class::<python::bindings::PySignal>()?;
    m.add_class::<python::bindings::PyTrade>()?;
    m.add_class::<python::bindings::PyBacktestStats>()?;
    m.add_class::<python::bindings::PyBacktestResult>()?;

    // Register pipeline functions
    m.add_function(wrap_pyfunction!(python::bindings::detect_zones, m)?)?;
    m.add_function(wrap_pyfunction!(python::bindings::generate_signals, m)?)?;
    m.add_function(wrap_pyfunction!(python::bindings::run_backtest, m)?)?;
    m.add_function(wrap_pyfunction!(python::bindings::init_logging, m)?)?;

    Ok(())
}
