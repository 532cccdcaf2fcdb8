//! Tracing initialization.

use std::sync::Once;

use envcat_core::config::LoggingConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable that overrides the configured filter.
pub const LOG_ENV: &str = "ENVCAT_LOG";

/// Initialize logging to stderr.
///
/// `ENVCAT_LOG` (e.g. `ENVCAT_LOG=envcat_storage=debug,envcat_retrieval=info`)
/// wins over `logging.filter`. Idempotent.
pub fn init_tracing(config: &LoggingConfig) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .or_else(|_| EnvFilter::try_new(&config.filter))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let registry = tracing_subscriber::registry().with(filter);
        if config.json {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_writer(std::io::stderr),
                )
                .init();
        } else {
            registry
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    });
}
