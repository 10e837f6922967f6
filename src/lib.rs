//! Process supervisor that mirrors a child's standard streams into a log.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────── SUPERVISOR ────────────────────────┐
//!                    │                                                            │
//!   parent stdin ────┼─▶ stdin tap ──────────────────────────▶ child stdin        │
//!                    │        │                                                   │
//!   parent stdout ◀──┼─── stdout tap ◀────────────────────── child stdout         │
//!                    │        │                                                   │
//!   parent stderr ◀──┼─── stderr tap ◀────────────────────── child stderr         │
//!                    │        │                                                   │
//!                    │        ▼                                                   │
//!                    │   ┌─────────┐      ┌────────────────┐                      │
//!                    │   │ LogSink │◀─────│signal forwarder│──── kill ──▶ child  │
//!                    │   └────┬────┘      └───────▲────────┘                      │
//!                    │        │                   │                               │
//!                    │        ▼            OS signals (catalog)                   │
//!                    │    log file                                                │
//!                    │                                                            │
//!                    │  lifecycle: Starting → Running → Draining → Exited         │
//!                    └────────────────────────────────────────────────────────────┘
//! ```

#[cfg(not(unix))]
compile_error!("log-supervisor relies on POSIX signals and only builds for unix targets");

// Core subsystems
pub mod config;
pub mod lifecycle;
pub mod logsink;
pub mod process;
pub mod relay;
pub mod signals;

// Cross-cutting concerns
pub mod cli;
pub mod error;
pub mod observability;

pub use config::SupervisorConfig;
pub use error::SupervisorError;
pub use lifecycle::{Exit, ParentStreams, Supervisor};
pub use logsink::{LogSink, LogTag};
