//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Starting:  open log → subscribe signals → spawn child
//! Running:   taps relay streams, forwarder relays signals
//! Draining:  child reaped → stdin tap stopped → stdout/stderr taps run
//!            to EOF → forwarder stopped → log closed
//! Exited:    supervisor exit code = child's exit code
//! ```
//!
//! # Design Decisions
//! - Ordered shutdown: stop input, drain output, close log
//! - The controller returns an `Exit`; only `main` ends the process
//! - Spawn failure goes straight from Starting to Exited

mod controller;
mod shutdown;
mod state;

pub use controller::{Exit, ParentStreams, Supervisor};
pub use shutdown::Shutdown;
pub use state::{Lifecycle, LifecycleState};
