//! Diagnostic logging on stderr.
//!
//! Stdout carries command output (including JSON meant for scripts), so all
//! logs go to stderr. The filter comes from `MCPX_LOG`, then `RUST_LOG`, then
//! `warn` (`debug` with `--verbose`).

use crate::constants::LOG_ENV;
use tracing_subscriber::EnvFilter;

pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    // A second init (e.g. from tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
