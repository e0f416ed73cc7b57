//! Core types and utilities for zonebt.

pub mod error;
pub mod series;
pub mod session;
pub mod types;

pub use error::{Result, ZoneBtError};
pub use series::PriceSeries;
pub use session::SessionConfig;
pub use types::*;
