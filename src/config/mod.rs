//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! command line (clap)
//!     → optional TOML file via loader.rs (parse & deserialize)
//!     → CLI values layered on top
//!     → validation.rs (semantic checks)
//!     → SupervisorConfig (validated, immutable)
//!     → handed to the lifecycle controller
//! ```
//!
//! # Design Decisions
//! - Config is immutable once the supervisor starts
//! - All sections have defaults so a file may set a single key
//! - The log path and the command only ever come from the command line
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{CommandSpec, LogConfig, LogMode, RelayConfig, SignalConfig, SupervisorConfig};
pub use validation::{validate_config, ValidationError};
