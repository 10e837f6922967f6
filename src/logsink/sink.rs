//! Mutex-guarded append-only log writer.

use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::fs::OpenOptions;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

use crate::config::LogMode;
use crate::logsink::LogTag;

type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Errors returned when appending to or closing the log.
#[derive(Debug, Error)]
pub enum LogSinkError {
    /// The sink has already been closed; nothing was written.
    #[error("log sink is closed")]
    Closed,

    #[error("log write failed: {0}")]
    Io(#[from] std::io::Error),
}

struct SinkState {
    writer: Option<BoxedWriter>,
    entries: u64,
}

/// Shared handle to the supervisor's log.
///
/// Cloning is cheap; all clones write through the same lock.
#[derive(Clone)]
pub struct LogSink {
    inner: Arc<Mutex<SinkState>>,
}

impl LogSink {
    /// Open the log file at `path`, truncating or appending per `mode`.
    pub async fn open(path: &Path, mode: LogMode) -> std::io::Result<Self> {
        let mut options = OpenOptions::new();
        options.create(true);
        match mode {
            LogMode::Truncate => options.write(true).truncate(true),
            LogMode::Append => options.append(true),
        };
        let file = options.open(path).await?;

        tracing::debug!(path = %path.display(), ?mode, "Log file opened");
        Ok(Self::from_writer(file))
    }

    /// Wrap an arbitrary writer, e.g. an in-memory buffer.
    pub fn from_writer<W>(writer: W) -> Self
    where
        W: AsyncWrite + Send + Unpin + 'static,
    {
        Self {
            inner: Arc::new(Mutex::new(SinkState {
                writer: Some(Box::new(writer)),
                entries: 0,
            })),
        }
    }

    /// Append one tagged entry.
    ///
    /// The entry is written and flushed while holding the lock, so entries
    /// from concurrent writers never interleave.
    pub async fn append(&self, tag: LogTag, payload: &[u8]) -> Result<(), LogSinkError> {
        let entry = format_entry(tag, payload);

        let mut state = self.inner.lock().await;
        let writer = state.writer.as_mut().ok_or(LogSinkError::Closed)?;
        writer.write_all(&entry).await?;
        writer.flush().await?;
        state.entries += 1;
        Ok(())
    }

    pub async fn info(&self, message: impl AsRef<str>) -> Result<(), LogSinkError> {
        self.append(LogTag::Info, message.as_ref().as_bytes()).await
    }

    pub async fn error(&self, message: impl AsRef<str>) -> Result<(), LogSinkError> {
        self.append(LogTag::Error, message.as_ref().as_bytes()).await
    }

    pub async fn signal(&self, message: impl AsRef<str>) -> Result<(), LogSinkError> {
        self.append(LogTag::Signal, message.as_ref().as_bytes()).await
    }

    /// Flush and close the underlying writer.
    ///
    /// Waits for any entry currently being written. Calling it again is a no-op.
    pub async fn close(&self) -> Result<(), LogSinkError> {
        let mut state = self.inner.lock().await;
        if let Some(mut writer) = state.writer.take() {
            writer.flush().await?;
            writer.shutdown().await?;
            tracing::debug!(entries = state.entries, "Log sink closed");
        }
        Ok(())
    }

    pub async fn is_closed(&self) -> bool {
        self.inner.lock().await.writer.is_none()
    }

    /// Number of entries written so far.
    pub async fn entries(&self) -> u64 {
        self.inner.lock().await.entries
    }
}

/// `[TAG] payload`, terminated by a newline if the payload lacks one.
fn format_entry(tag: LogTag, payload: &[u8]) -> Vec<u8> {
    let marker = tag.marker().as_bytes();
    let mut entry = Vec::with_capacity(marker.len() + payload.len() + 2);
    entry.extend_from_slice(marker);
    entry.push(b' ');
    entry.extend_from_slice(payload);
    if !payload.ends_with(b"\n") {
        entry.push(b'\n');
    }
    entry
}
