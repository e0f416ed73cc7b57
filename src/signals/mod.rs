//! Signal generation for zonebt.
//!
//! Turns price interactions with detected zones into ordered, de-duplicated
//! trade signals.

pub mod generator;
pub mod policy;
pub mod processor;
pub mod volume;

pub use generator::{generate_signals, SignalConfig, SignalGenerator};
pub use policy::SignalPolicy;
pub use processor::{dedup_levels, dedup_signals, SignalProcessor};
pub use volume::VolumeFilter;
