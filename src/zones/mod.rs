//! Support/resistance zone detection.

pub mod cluster;
pub mod detector;
pub mod swing;

pub use cluster::{cluster_levels, enforce_separation, LevelClusterer};
pub use detector::{detect_zones, ZoneConfig, ZoneDetector};
pub use swing::{find_swing_points, SwingPoint, SwingPoints};
