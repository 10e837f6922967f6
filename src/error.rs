//! Fatal error taxonomy for the supervisor.
//!
//! Only these errors end a run abnormally. Signal subscription and delivery
//! failures are recovered where they happen (see `signals`).

use clap::error::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::process::SpawnError;

/// One-line usage summary printed after argument errors.
pub const USAGE: &str = "Usage: log-supervisor <log_file> <command> [arguments...]";

#[derive(Debug, Error)]
pub enum SupervisorError {
    /// Bad or missing command-line arguments. No log file is touched.
    #[error("{}", usage_message(.0))]
    Usage(clap::Error),

    #[error("Error: {0}")]
    Config(#[from] ConfigError),

    /// The log file could not be opened. No child is spawned.
    #[error("Error: Failed to open log file.\n{}: {source}", .path.display())]
    LogOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to start subprocess: {0}")]
    Spawn(#[from] SpawnError),
}

impl SupervisorError {
    /// `--help` and `--version` surface as usage "errors" that exit cleanly.
    pub fn is_informational(&self) -> bool {
        matches!(
            self,
            SupervisorError::Usage(err)
                if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion)
        )
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_informational() {
            0
        } else {
            1
        }
    }

    /// Print the error the way the terminal user expects to see it.
    pub fn report(&self) {
        match self {
            SupervisorError::Usage(err) if self.is_informational() => {
                let _ = err.print();
            }
            _ => eprintln!("{}", self),
        }
    }
}

fn usage_message(err: &clap::Error) -> String {
    match err.kind() {
        ErrorKind::MissingRequiredArgument => format!("Error: Not enough arguments\n{}", USAGE),
        _ => err.to_string().trim_end().to_string(),
    }
}
