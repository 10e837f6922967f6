//! Stream relay subsystem.
//!
//! # Data Flow
//! ```text
//! child stdout ─▶ tap ─▶ parent stdout, then log [STDOUT]
//! child stderr ─▶ tap ─▶ parent stderr, then log [STDERR]
//! parent stdin ─▶ tap ─▶ child stdin,   then log [STDIN]
//! ```
//!
//! # Design Decisions
//! - One task per tap; a slow sink only stalls its own source
//! - Forward first, log second
//! - Ordering is total within a tap, unspecified across taps
//! - Cancellation only happens while waiting for input, never mid-write

mod tap;

pub use tap::{StreamTap, TapOutcome, TapReport};
