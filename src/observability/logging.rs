//! Structured diagnostic logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Read the filter from the environment
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Writes to stderr; stdout belongs to the child
//! - Default level is `warn` so the supervisor is invisible unless asked

use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the diagnostic filter directives.
pub const FILTER_ENV: &str = "LOG_SUPERVISOR_LOG";

/// Directives used when neither `LOG_SUPERVISOR_LOG` nor `RUST_LOG` is set.
pub const DEFAULT_FILTER: &str = "log_supervisor=warn";

/// Build the filter: `LOG_SUPERVISOR_LOG`, then `RUST_LOG`, then the default.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(FILTER_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. A second call is ignored.
pub fn init() {
    let stderr_is_tty = std::io::stderr().is_terminal();
    let result = tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(stderr_is_tty),
        )
        .try_init();

    if result.is_ok() {
        tracing::debug!(filter_env = FILTER_ENV, "Diagnostics initialized");
    }
}
