//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the command and log path are present
//! - Check forwarded signal names exist in the catalog
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SupervisorConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;

use crate::config::schema::SupervisorConfig;
use crate::signals::CatalogSignal;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("log file path is empty")]
    EmptyLogPath,

    #[error("command is empty")]
    EmptyCommand,

    #[error("relay.chunk_size must be greater than zero")]
    ZeroChunkSize,

    #[error("unknown signal in signals.forward: {0}")]
    UnknownSignal(String),
}

/// Validate a fully assembled configuration.
pub fn validate_config(config: &SupervisorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.log.path.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyLogPath);
    }

    if config.command.program.is_empty() {
        errors.push(ValidationError::EmptyCommand);
    }

    if config.relay.chunk_size == 0 {
        errors.push(ValidationError::ZeroChunkSize);
    }

    for name in &config.signals.forward {
        if CatalogSignal::from_name(name).is_none() {
            errors.push(ValidationError::UnknownSignal(name.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CommandSpec;

    fn valid() -> SupervisorConfig {
        let mut config = SupervisorConfig::default();
        config.log.path = "run.log".into();
        config.command = CommandSpec::new("echo", ["hello"]);
        config
    }

    #[test]
    fn accepts_complete_config() {
        assert!(validate_config(&valid()).is_ok());
    }

    #[test]
    fn reports_every_problem() {
        let mut config = SupervisorConfig::default();
        config.relay.chunk_size = 0;
        config.signals.forward.push("SIGNOPE".into());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::EmptyLogPath,
                ValidationError::EmptyCommand,
                ValidationError::ZeroChunkSize,
                ValidationError::UnknownSignal("SIGNOPE".into()),
            ]
        );
    }

    #[test]
    fn short_signal_names_are_accepted() {
        let mut config = valid();
        config.signals.forward = vec!["int".into(), "USR1".into()];
        assert!(validate_config(&config).is_ok());
    }
}
