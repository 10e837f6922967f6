//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the supervisor.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

/// Root configuration for the supervisor.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SupervisorConfig {
    /// Log file settings.
    pub log: LogConfig,

    /// Stream relay tuning.
    pub relay: RelayConfig,

    /// Signal interception and forwarding.
    pub signals: SignalConfig,

    /// The supervised command. Supplied on the command line only.
    #[serde(skip)]
    pub command: CommandSpec,
}

/// Log file configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct LogConfig {
    /// Path of the log file. Supplied on the command line only.
    #[serde(skip)]
    pub path: PathBuf,

    /// Whether an existing log file is truncated or appended to.
    pub mode: LogMode,
}

/// How the log file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogMode {
    /// Start every run with an empty log.
    #[default]
    Truncate,
    /// Keep previous runs and add to the end.
    Append,
}

/// Stream relay configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Maximum bytes read from a source in one chunk.
    pub chunk_size: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self { chunk_size: 8192 }
    }
}

/// Signal handling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Subscribe to the signal catalog at all.
    pub enabled: bool,

    /// Signals relayed to the child in addition to being logged.
    pub forward: Vec<String>,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            forward: vec![
                "SIGHUP".to_string(),
                "SIGINT".to_string(),
                "SIGQUIT".to_string(),
                "SIGTERM".to_string(),
            ],
        }
    }
}

/// Program and arguments of the supervised child.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSpec {
    /// Executable name or path, resolved through `PATH`.
    pub program: OsString,
    /// Arguments passed verbatim, byte for byte.
    pub args: Vec<OsString>,
}

impl CommandSpec {
    pub fn new(
        program: impl Into<OsString>,
        args: impl IntoIterator<Item = impl Into<OsString>>,
    ) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_truncate_and_forward_termination_signals() {
        let config = SupervisorConfig::default();
        assert_eq!(config.log.mode, LogMode::Truncate);
        assert_eq!(config.relay.chunk_size, 8192);
        assert!(config.signals.enabled);
        assert_eq!(config.signals.forward, ["SIGHUP", "SIGINT", "SIGQUIT", "SIGTERM"]);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: SupervisorConfig = toml::from_str(
            r#"
            [log]
            mode = "append"
            "#,
        )
        .unwrap();
        assert_eq!(config.log.mode, LogMode::Append);
        assert_eq!(config.relay.chunk_size, 8192);
        assert_eq!(config.signals.forward.len(), 4);
    }

    #[test]
    fn command_display_joins_args() {
        let spec = CommandSpec::new("echo", ["hello", "world"]);
        assert_eq!(spec.to_string(), "echo hello world");
    }

    #[test]
    fn command_display_tolerates_non_utf8() {
        use std::os::unix::ffi::OsStrExt;

        let raw = std::ffi::OsStr::from_bytes(b"a\xffb");
        let spec = CommandSpec::new("printf", [raw]);
        assert_eq!(spec.args[0].as_bytes(), b"a\xffb");
        assert_eq!(spec.to_string(), "printf a\u{FFFD}b");
    }
}
