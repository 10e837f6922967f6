//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured diagnostic events on stderr)
//!     → metrics.rs (counters for relayed bytes and signals)
//! ```
//!
//! # Design Decisions
//! - Diagnostics are separate from the supervised log file
//! - Quiet by default so passthrough output stays faithful
//! - Metrics are cheap no-ops unless a recorder is installed

pub mod logging;
pub mod metrics;
