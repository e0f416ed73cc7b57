//! Python bindings (feature `python`).

pub mod bindings;
pub mod numpy_bridge;
