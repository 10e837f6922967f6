//! Persistent log sink subsystem.
//!
//! # Data Flow
//! ```text
//! stdout tap ─┐
//! stderr tap ─┤
//! stdin tap  ─┼─▶ LogSink (async mutex) ─▶ log file
//! forwarder  ─┤
//! lifecycle  ─┘
//! ```
//!
//! # Design Decisions
//! - One mutex-guarded writer; every entry is a single locked write
//! - Each entry is flushed before the lock is released
//! - Close waits for the lock, so in-flight entries land before the file closes

mod sink;
mod tag;

pub use sink::{LogSink, LogSinkError};
pub use tag::LogTag;
