//! A single duplication point: one source, a primary sink and the log.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::broadcast;

use crate::logsink::{LogSink, LogSinkError, LogTag};
use crate::observability::metrics;

/// Why a tap stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// The source reached end-of-stream.
    SourceClosed,
    /// Reading the source failed.
    ReadFailed,
    /// The log was closed underneath the tap.
    LogClosed,
    /// Shutdown was triggered while waiting for input.
    Cancelled,
}

/// Summary returned when a tap finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapReport {
    pub tag: LogTag,
    pub bytes: u64,
    pub chunks: u64,
    /// The primary sink refused a write and later chunks went to the log only.
    pub primary_failed: bool,
    pub outcome: TapOutcome,
}

enum Read {
    Data(usize),
    Eof,
    Failed(std::io::Error),
    Cancelled,
}

/// Copies `source` to `primary` chunk by chunk, appending each chunk to the log.
pub struct StreamTap<R, W> {
    tag: LogTag,
    source: R,
    primary: W,
    log: LogSink,
    chunk_size: usize,
    shutdown: Option<broadcast::Receiver<()>>,
}

impl<R, W> StreamTap<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(tag: LogTag, source: R, primary: W, log: LogSink, chunk_size: usize) -> Self {
        Self {
            tag,
            source,
            primary,
            log,
            chunk_size: chunk_size.max(1),
            shutdown: None,
        }
    }

    /// Stop the tap when `shutdown` fires while it is waiting for input.
    pub fn with_shutdown(mut self, shutdown: broadcast::Receiver<()>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Relay until the source ends, the log closes, or shutdown fires.
    ///
    /// If the primary sink fails (the child closed its stdin, the parent's
    /// stdout went away) the tap keeps draining its source into the log so
    /// the writer on the other side never blocks on a full pipe.
    ///
    /// The primary sink is dropped on return; for the stdin tap that closes
    /// the child's input so it observes end-of-file.
    pub async fn run(mut self) -> TapReport {
        let tag = self.tag;
        let mut buf = vec![0u8; self.chunk_size];
        let mut bytes = 0u64;
        let mut chunks = 0u64;
        let mut primary_open = true;

        tracing::debug!(stream = tag.name(), "Tap started");

        let outcome = loop {
            let n = match self.next_chunk(&mut buf).await {
                Read::Data(n) => n,
                Read::Eof => break TapOutcome::SourceClosed,
                Read::Cancelled => break TapOutcome::Cancelled,
                Read::Failed(err) => {
                    tracing::warn!(stream = tag.name(), error = %err, "Tap source read failed");
                    log_error(&self.log, tag, format!("{} read failed: {}", tag.name(), err)).await;
                    break TapOutcome::ReadFailed;
                }
            };
            let chunk = &buf[..n];
            bytes += n as u64;
            chunks += 1;
            metrics::record_relay_chunk(tag, n);

            let forwarded = if primary_open {
                forward(&mut self.primary, chunk).await
            } else {
                Ok(())
            };

            match self.log.append(tag, chunk).await {
                Ok(()) => {}
                Err(LogSinkError::Closed) => break TapOutcome::LogClosed,
                Err(err) => {
                    tracing::warn!(stream = tag.name(), error = %err, "Failed to log chunk");
                }
            }

            if let Err(err) = forwarded {
                primary_open = false;
                tracing::warn!(stream = tag.name(), error = %err, "Tap primary write failed");
                let message = format!("{} forward failed: {}; relaying to log only", tag.name(), err);
                log_error(&self.log, tag, message).await;
            }
        };

        if primary_open {
            let _ = self.primary.shutdown().await;
        }

        tracing::debug!(stream = tag.name(), bytes, chunks, ?outcome, "Tap stopped");
        TapReport {
            tag,
            bytes,
            chunks,
            primary_failed: !primary_open,
            outcome,
        }
    }

    async fn next_chunk(&mut self, buf: &mut [u8]) -> Read {
        let Self {
            source, shutdown, ..
        } = self;

        let result = match shutdown {
            Some(shutdown) => {
                tokio::select! {
                    biased;
                    _ = shutdown.recv() => return Read::Cancelled,
                    result = source.read(buf) => result,
                }
            }
            None => source.read(buf).await,
        };

        match result {
            Ok(0) => Read::Eof,
            Ok(n) => Read::Data(n),
            Err(err) => Read::Failed(err),
        }
    }
}

// Borrows only the sink so `run` stays `Send` for non-`Sync` streams.
async fn log_error(log: &LogSink, tag: LogTag, message: String) {
    if let Err(err) = log.error(message).await {
        tracing::debug!(stream = tag.name(), error = %err, "Failed to log tap error");
    }
}

async fn forward<W: AsyncWrite + Unpin>(primary: &mut W, chunk: &[u8]) -> std::io::Result<()> {
    primary.write_all(chunk).await?;
    primary.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogMode;
    use crate::lifecycle::Shutdown;

    async fn log_in(dir: &tempfile::TempDir) -> (LogSink, std::path::PathBuf) {
        let path = dir.path().join("tap.log");
        (LogSink::open(&path, LogMode::Truncate).await.unwrap(), path)
    }

    #[tokio::test]
    async fn forwards_then_logs_every_chunk_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let (log, path) = log_in(&dir).await;
        let mut primary = Vec::new();

        let source: &[u8] = b"first line\nsecond line\n";
        let report = StreamTap::new(LogTag::Stdout, source, &mut primary, log.clone(), 11)
            .run()
            .await;
        log.close().await.unwrap();

        assert_eq!(primary, b"first line\nsecond line\n");
        assert_eq!(report.outcome, TapOutcome::SourceClosed);
        assert_eq!(report.bytes, 23);
        assert_eq!(report.chunks, 3);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "[STDOUT] first line\n[STDOUT] second line\n[STDOUT] \n"
        );
    }

    #[tokio::test]
    async fn empty_source_stops_without_entries() {
        let dir = tempfile::tempdir().unwrap();
        let (log, _path) = log_in(&dir).await;

        let report = StreamTap::new(LogTag::Stderr, tokio::io::empty(), tokio::io::sink(), log.clone(), 64)
            .run()
            .await;

        assert_eq!(report.outcome, TapOutcome::SourceClosed);
        assert_eq!(report.bytes, 0);
        assert_eq!(log.entries().await, 0);
    }

    #[tokio::test]
    async fn shutdown_cancels_idle_read() {
        let dir = tempfile::tempdir().unwrap();
        let (log, _path) = log_in(&dir).await;
        let (_writer, idle_source) = tokio::io::duplex(64);
        let shutdown = Shutdown::new();

        let tap = StreamTap::new(LogTag::Stdin, idle_source, tokio::io::sink(), log, 64)
            .with_shutdown(shutdown.subscribe());
        let handle = tokio::spawn(tap.run());
        shutdown.trigger();

        let report = handle.await.unwrap();
        assert_eq!(report.outcome, TapOutcome::Cancelled);
    }

    #[tokio::test]
    async fn boxed_streams_run_on_spawned_task() {
        let dir = tempfile::tempdir().unwrap();
        let (log, path) = log_in(&dir).await;
        let source: Box<dyn AsyncRead + Send + Unpin> = Box::new(&b"boxed\n"[..]);
        let primary: Box<dyn AsyncWrite + Send + Unpin> = Box::new(tokio::io::sink());

        let report = tokio::spawn(StreamTap::new(LogTag::Stdout, source, primary, log.clone(), 64).run())
            .await
            .unwrap();
        log.close().await.unwrap();

        assert_eq!(report.outcome, TapOutcome::SourceClosed);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[STDOUT] boxed\n");
    }

    #[tokio::test]
    async fn closed_primary_falls_back_to_log_only() {
        let dir = tempfile::tempdir().unwrap();
        let (log, path) = log_in(&dir).await;
        let (primary, reader) = tokio::io::duplex(64);
        drop(reader);

        let source: &[u8] = b"typed input\n";
        let report = StreamTap::new(LogTag::Stdin, source, primary, log.clone(), 6)
            .run()
            .await;
        log.close().await.unwrap();

        assert_eq!(report.outcome, TapOutcome::SourceClosed);
        assert!(report.primary_failed);
        assert_eq!(report.bytes, 12);
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("[STDIN] typed \n[ERROR] stdin forward failed"));
        assert!(contents.ends_with("relaying to log only\n[STDIN] input\n"));
        assert_eq!(contents.matches("[ERROR]").count(), 1);
    }

    #[tokio::test]
    async fn closed_log_stops_tap() {
        let dir = tempfile::tempdir().unwrap();
        let (log, _path) = log_in(&dir).await;
        log.close().await.unwrap();

        let source: &[u8] = b"late output";
        let mut primary = Vec::new();
        let report = StreamTap::new(LogTag::Stdout, source, &mut primary, log, 64)
            .run()
            .await;

        assert_eq!(report.outcome, TapOutcome::LogClosed);
        assert_eq!(primary, b"late output");
    }

    #[tokio::test]
    async fn slow_primary_applies_backpressure() {
        let dir = tempfile::tempdir().unwrap();
        let (log, path) = log_in(&dir).await;
        // An 8-byte pipe forces the tap to wait for the reader between chunks.
        let (primary, mut reader) = tokio::io::duplex(8);
        let payload: Vec<u8> = (0..4096u32).map(|i| b'a' + (i % 26) as u8).collect();
        let source = std::io::Cursor::new(payload.clone());

        let tap = tokio::spawn(StreamTap::new(LogTag::Stdout, source, primary, log.clone(), 128).run());

        let mut received = Vec::new();
        reader.read_to_end(&mut received).await.unwrap();
        let report = tap.await.unwrap();
        log.close().await.unwrap();

        assert_eq!(received, payload);
        assert_eq!(report.outcome, TapOutcome::SourceClosed);
        let logged: Vec<u8> = std::fs::read(&path)
            .unwrap()
            .split(|b| *b == b'\n')
            .filter(|line| !line.is_empty())
            .flat_map(|line| line.strip_prefix(b"[STDOUT] ").unwrap().to_vec())
            .collect();
        assert_eq!(logged, payload);
    }
}
