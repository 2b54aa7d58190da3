//! `tracing` subscriber setup.
//!
//! Library crates only emit events; binaries call [`init_logging`] once at
//! startup to decide where those events go.

use tracing_subscriber::EnvFilter;

/// Environment variable consulted when no explicit filter is given.
pub const LOG_ENV_VAR: &str = "TESSEL_LOG";

/// Install a formatting subscriber on stderr.
///
/// The filter is taken from `filter` if given, else from [`LOG_ENV_VAR`],
/// else defaults to `warn`. Calling this twice is harmless: the second
/// installation fails silently and the first subscriber stays active.
pub fn init_logging(filter: Option<&str>) {
    let filter = filter
        .map(EnvFilter::new)
        .or_else(|| EnvFilter::try_from_env(LOG_ENV_VAR).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
