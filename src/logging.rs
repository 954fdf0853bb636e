use std::io::IsTerminal;

use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info";

/// Install the process-wide stderr subscriber. `RUST_LOG` overrides the
/// default `info` filter. Safe to call more than once.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_timer(fmt::time::ChronoLocal::rfc_3339())
        .with_target(false)
        .try_init();
}
