//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Filter used when neither `RUST_LOG` nor a caller filter is given.
pub const DEFAULT_FILTER: &str = "zonebt=info,warn";

/// Install a global fmt subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence over `default_filter`. Returns `false` when a
/// global subscriber was already installed, in which case nothing changes.
pub fn init_tracing(default_filter: Option<&str>) -> bool {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter.unwrap_or(DEFAULT_FILTER)));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .try_init()
        .is_ok()
}
