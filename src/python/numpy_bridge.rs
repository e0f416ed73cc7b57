//! numpy array conversion helpers.

use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::prelude::*;

use crate::core::series::PriceSeries;

/// Copy a numpy float array into a Vec, contiguous or not.
pub fn numpy_to_vec_f64(arr: PyReadonlyArray1<f64>) -> Vec<f64> {
    arr.as_array().iter().copied().collect()
}

/// Copy a numpy int64 array into a Vec, contiguous or not.
pub fn numpy_to_vec_i64(arr: PyReadonlyArray1<i64>) -> Vec<i64> {
    arr.as_array().iter().copied().collect()
}

/// Convert Vec<f64> to numpy array.
pub fn vec_to_numpy_f64<'py>(py: Python<'py>, vec: Vec<f64>) -> &'py PyArray1<f64> {
    PyArray1::from_vec(py, vec)
}

/// Convert Vec<i64> to numpy array.
pub fn vec_to_numpy_i64<'py>(py: Python<'py>, vec: Vec<i64>) -> &'py PyArray1<i64> {
    PyArray1::from_vec(py, vec)
}

/// Build a validated [`PriceSeries`] from numpy OHLC(V) columns.
pub fn series_from_numpy(
    timestamps: PyReadonlyArray1<i64>,
    open: PyReadonlyArray1<f64>,
    high: PyReadonlyArray1<f64>,
    low: PyReadonlyArray1<f64>,
    close: PyReadonlyArray1<f64>,
    volume: Option<PyReadonlyArray1<f64>>,
) -> PyResult<PriceSeries> {
    let series = PriceSeries::new(
        numpy_to_vec_i64(timestamps),
        numpy_to_vec_f64(open),
        numpy_to_vec_f64(high),
        numpy_to_vec_f64(low),
        numpy_to_vec_f64(close),
        volume.map(numpy_to_vec_f64),
    )?;
    Ok(series)
}
