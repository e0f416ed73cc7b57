//! Error types for zonebt.

use thiserror::Error;

/// Result type alias for zonebt operations.
pub type Result<T> = std::result::Result<T, ZoneBtError>;

/// Error types for the zone/signal/backtest pipeline.
///
/// Every variant is raised synchronously and is final for the current run;
/// callers fix their inputs and invoke again. Empty outputs (no zones, no
/// signals, no resolved trades) are never reported through this type.
#[derive(Error, Debug)]
pub enum ZoneBtError {
    /// Price series columns are missing, mis-sized or out of order.
    #[error("Invalid input shape: {message}")]
    InputShape { message: String },

    /// Signal timestamps that do not exist in the price series.
    #[error("Data alignment error: {unmatched} of {total} signal timestamps not found in series")]
    DataAlignment { unmatched: usize, total: usize },

    /// Invalid configuration value.
    #[error("Invalid configuration: {message}")]
    Configuration { message: String },

    /// Config file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Config file could not be parsed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ZoneBtError {
    /// Create an input shape error.
    pub fn input_shape(message: impl Into<String>) -> Self {
        Self::InputShape {
            message: message.into(),
        }
    }

    /// Create a data alignment error.
    pub fn data_alignment(unmatched: usize, total: usize) -> Self {
        Self::DataAlignment { unmatched, total }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

#[cfg(feature = "python")]
impl From<ZoneBtError> for pyo3::PyErr {
    fn from(err: ZoneBtError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_message_reports_count() {
        let err = ZoneBtError::data_alignment(3, 10);
        assert_eq!(
            err.to_string(),
            "Data alignment error: 3 of 10 signal timestamps not found in series"
        );
    }

    #[test]
    fn test_configuration_message() {
        let err = ZoneBtError::configuration("window must be at least 1");
        assert!(err.to_string().contains("window must be at least 1"));
    }
}
