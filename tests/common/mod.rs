//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite};

use log_supervisor::config::{CommandSpec, SupervisorConfig};
use log_supervisor::ParentStreams;

/// An in-memory sink that stays readable after being boxed into `ParentStreams`.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl AsyncWrite for SharedBuffer {
    fn poll_write(self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// Parent streams backed by memory: fixed stdin, captured stdout and stderr.
pub fn memory_streams(stdin: &'static [u8]) -> (ParentStreams, SharedBuffer, SharedBuffer) {
    streams_with_stdin(stdin)
}

/// Parent streams reading from `stdin`, with captured stdout and stderr.
pub fn streams_with_stdin<R>(stdin: R) -> (ParentStreams, SharedBuffer, SharedBuffer)
where
    R: AsyncRead + Send + Unpin + 'static,
{
    let stdout = SharedBuffer::default();
    let stderr = SharedBuffer::default();
    let streams = ParentStreams {
        stdin: Box::new(stdin),
        stdout: Box::new(stdout.clone()),
        stderr: Box::new(stderr.clone()),
    };
    (streams, stdout, stderr)
}

/// A config for `program args...` logging to `log_path`, with signal
/// interception disabled so the test process keeps its own handlers.
pub fn supervisor_config(log_path: &Path, program: &str, args: &[&str]) -> SupervisorConfig {
    let mut config = SupervisorConfig::default();
    config.log.path = log_path.to_path_buf();
    config.command = CommandSpec::new(program, args.iter().copied());
    config.signals.enabled = false;
    config
}

pub fn log_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join("supervisor.log")
}

pub fn read_log(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}
