//! Command-line interface.
//!
//! `log-supervisor [OPTIONS] <LOG_FILE> <COMMAND> [ARGS]...`
//!
//! Everything after the command is passed to the child untouched, including
//! arguments that look like options.

use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::config::{load_config, validate_config, CommandSpec, ConfigError, LogMode, SupervisorConfig};
use crate::error::SupervisorError;

#[derive(Debug, Parser)]
#[command(name = "log-supervisor", version)]
#[command(about = "Run a command, mirroring its standard streams and signals into a log file", long_about = None)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Append to the log file instead of truncating it.
    #[arg(short, long)]
    pub append: bool,

    /// Maximum bytes relayed per read.
    #[arg(long, value_name = "BYTES")]
    pub chunk_size: Option<usize>,

    /// Log file receiving every relayed chunk and signal.
    #[arg(value_name = "LOG_FILE")]
    pub log_file: PathBuf,

    /// Command to run, followed by its arguments.
    #[arg(
        value_name = "COMMAND",
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<OsString>,
}

impl Cli {
    /// Parse arguments, mapping clap failures to [`SupervisorError::Usage`].
    pub fn parse_from_args<I, T>(args: I) -> Result<Self, SupervisorError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_from(args).map_err(SupervisorError::Usage)
    }

    /// Layer the command line over the optional config file and validate.
    pub fn into_config(self) -> Result<SupervisorConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => SupervisorConfig::default(),
        };

        config.log.path = self.log_file;
        if self.append {
            config.log.mode = LogMode::Append;
        }
        if let Some(chunk_size) = self.chunk_size {
            config.relay.chunk_size = chunk_size;
        }

        let mut command = self.command.into_iter();
        let program = command.next().unwrap_or_default();
        config.command = CommandSpec::new(program, command);

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}
