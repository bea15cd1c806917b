//! Subscriber setup for the `archigraph` binary. The library only emits events.

use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub const LOG_ENV: &str = "ARCHIGRAPH_LOG";
const DEFAULT_FILTER: &str = "warn";

static INIT: Once = Once::new();

/// Installs a stderr subscriber. `ARCHIGRAPH_LOG` takes `EnvFilter` directives
/// (e.g. `archigraph=debug`); `verbose` forces `debug`. Later calls are no-ops.
pub fn init_logging(verbose: bool) {
    INIT.call_once(|| {
        let filter = if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
        };
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(filter)
            .try_init();
    });
}
