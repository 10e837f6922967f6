//! Entry tags identifying where a log line came from.

use std::fmt;

/// Prefix written at the start of every log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogTag {
    Stdout,
    Stderr,
    Stdin,
    Signal,
    Info,
    Error,
}

impl LogTag {
    /// The bracketed marker written to the log, e.g. `[STDOUT]`.
    pub fn marker(self) -> &'static str {
        match self {
            LogTag::Stdout => "[STDOUT]",
            LogTag::Stderr => "[STDERR]",
            LogTag::Stdin => "[STDIN]",
            LogTag::Signal => "[SIGNAL]",
            LogTag::Info => "[INFO]",
            LogTag::Error => "[ERROR]",
        }
    }

    /// Lowercase name used for metric labels and diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            LogTag::Stdout => "stdout",
            LogTag::Stderr => "stderr",
            LogTag::Stdin => "stdin",
            LogTag::Signal => "signal",
            LogTag::Info => "info",
            LogTag::Error => "error",
        }
    }
}

impl fmt::Display for LogTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}
