//! Child process management.
//!
//! # Responsibilities
//! - Spawn the supervised command with three piped standard streams
//! - Hand the pipes to the relay and keep the process handle for reaping
//! - Share a signal target that stays valid only while the child is alive
//! - Translate the child's exit status into the supervisor's exit code

mod exit;
mod launcher;
mod target;

pub use exit::ChildExit;
pub use launcher::{ChildHandle, ChildPipes, Launcher, SpawnError};
pub use target::ChildTarget;
