//! Spawning the supervised command.

use std::process::Stdio;
use thiserror::Error;
use tokio::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command};

use crate::config::CommandSpec;
use crate::process::{ChildExit, ChildTarget};

/// The command could not be started.
#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("{program}: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program}: exited before its pid could be read")]
    NoPid { program: String },

    #[error("{program}: child {stream} was not captured")]
    MissingPipe {
        program: String,
        stream: &'static str,
    },
}

/// The child's end of the three standard streams, handed to the relay.
pub struct ChildPipes {
    pub stdin: ChildStdin,
    pub stdout: ChildStdout,
    pub stderr: ChildStderr,
}

/// Owns the spawned process until it is reaped.
pub struct ChildHandle {
    child: Child,
    target: ChildTarget,
}

impl ChildHandle {
    pub fn pid(&self) -> i32 {
        self.target.pid()
    }

    /// A non-owning reference for signal delivery.
    pub fn target(&self) -> ChildTarget {
        self.target.clone()
    }

    /// Wait for the child to terminate.
    ///
    /// The shared target stops accepting signals as soon as the status is in.
    pub async fn wait(&mut self) -> std::io::Result<ChildExit> {
        let status = self.child.wait().await;
        self.target.mark_exited();
        Ok(ChildExit::from(status?))
    }
}

/// Starts child processes with independent stdin/stdout/stderr pipes.
pub struct Launcher;

impl Launcher {
    pub fn spawn(spec: &CommandSpec) -> Result<(ChildHandle, ChildPipes), SpawnError> {
        let mut child = Command::new(&spec.program)
            .args(&spec.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| SpawnError::Io {
                program: spec.program.to_string_lossy().into_owned(),
                source,
            })?;

        let pid = child.id().ok_or_else(|| SpawnError::NoPid {
            program: spec.program.to_string_lossy().into_owned(),
        })?;

        let missing = |stream| SpawnError::MissingPipe {
            program: spec.program.to_string_lossy().into_owned(),
            stream,
        };
        let pipes = ChildPipes {
            stdin: child.stdin.take().ok_or_else(|| missing("stdin"))?,
            stdout: child.stdout.take().ok_or_else(|| missing("stdout"))?,
            stderr: child.stderr.take().ok_or_else(|| missing("stderr"))?,
        };

        tracing::info!(pid, command = %spec, "Child spawned");
        Ok((
            ChildHandle {
                child,
                target: ChildTarget::new(pid),
            },
            pipes,
        ))
    }
}
