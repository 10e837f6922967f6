//! OS signal interception and forwarding.
//!
//! # Data Flow
//! ```text
//! catalog.rs   fixed list of 34 signal names → platform numbers
//!     → subscription.rs (best-effort registration, one listener task each)
//!     → mpsc channel of SignalEvent
//!     → forwarder.rs (log entry, relay forwarded subset to the child)
//! ```
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - A signal that cannot be registered is skipped, never fatal
//! - Aliases sharing a number are registered once
//! - Delivery goes through the `SignalTarget` trait so tests can record it

mod catalog;
mod forwarder;
mod subscription;

pub use catalog::CatalogSignal;
pub use forwarder::{ForwarderReport, SignalDeliveryError, SignalForwarder, SignalTarget};
pub use subscription::{subscribe_all, SignalEvent, SignalSubscribeError, SubscriptionReport};
