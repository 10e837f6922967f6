//! The lifecycle controller: owns the supervised run from spawn to exit.
//!
//! # Responsibilities
//! - Open the log, subscribe signals, spawn the child
//! - Start one task per tap plus the signal forwarder
//! - Reap the child, stop input relay, drain its output, stop the forwarder
//! - Close the log exactly once and produce the exit code

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::SupervisorConfig;
use crate::error::SupervisorError;
use crate::lifecycle::{Lifecycle, LifecycleState, Shutdown};
use crate::logsink::{LogSink, LogTag};
use crate::process::{ChildExit, Launcher};
use crate::relay::{StreamTap, TapReport};
use crate::signals::{subscribe_all, CatalogSignal, SignalEvent, SignalForwarder};

/// Capacity of the queue between signal listeners and the forwarder.
const SIGNAL_QUEUE_DEPTH: usize = 64;

/// The supervisor's own standard streams.
///
/// Injected so tests can substitute in-memory buffers.
pub struct ParentStreams {
    pub stdin: Box<dyn AsyncRead + Send + Unpin>,
    pub stdout: Box<dyn AsyncWrite + Send + Unpin>,
    pub stderr: Box<dyn AsyncWrite + Send + Unpin>,
}

impl ParentStreams {
    /// The process's real stdin, stdout and stderr.
    pub fn inherit() -> Self {
        Self {
            stdin: Box::new(tokio::io::stdin()),
            stdout: Box::new(tokio::io::stdout()),
            stderr: Box::new(tokio::io::stderr()),
        }
    }
}

/// Exit code the supervisor process should terminate with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exit {
    code: i32,
}

impl Exit {
    pub fn success() -> Self {
        Self { code: 0 }
    }

    pub fn failure() -> Self {
        Self { code: 1 }
    }

    pub fn code(self) -> i32 {
        self.code
    }
}

impl From<ChildExit> for Exit {
    fn from(exit: ChildExit) -> Self {
        Self {
            code: exit.exit_code(),
        }
    }
}

impl From<&SupervisorError> for Exit {
    fn from(err: &SupervisorError) -> Self {
        Self {
            code: err.exit_code(),
        }
    }
}

/// Runs one child under supervision.
pub struct Supervisor {
    config: SupervisorConfig,
    streams: ParentStreams,
    lifecycle: Lifecycle,
}

impl Supervisor {
    pub fn new(config: SupervisorConfig, streams: ParentStreams) -> Self {
        Self {
            config,
            streams,
            lifecycle: Lifecycle::new(),
        }
    }

    /// Supervise the configured command to completion.
    ///
    /// Never terminates the process itself; the caller exits with the
    /// returned code.
    pub async fn run(self) -> Exit {
        let Supervisor {
            config,
            streams,
            mut lifecycle,
        } = self;
        let ParentStreams {
            stdin,
            stdout,
            mut stderr,
        } = streams;

        let log = match LogSink::open(&config.log.path, config.log.mode).await {
            Ok(log) => log,
            Err(source) => {
                let err = SupervisorError::LogOpen {
                    path: config.log.path.clone(),
                    source,
                };
                report(&mut stderr, &err).await;
                lifecycle.advance(LifecycleState::Exited);
                return Exit::from(&err);
            }
        };

        let (signal_tx, signal_rx) = mpsc::channel::<SignalEvent>(SIGNAL_QUEUE_DEPTH);
        if config.signals.enabled {
            let subscriptions = subscribe_all(&CatalogSignal::ALL, signal_tx);
            tracing::debug!(
                subscribed = ?subscriptions.subscribed,
                skipped = subscriptions.skipped.len(),
                "Signals subscribed"
            );
        } else {
            drop(signal_tx);
        }

        let (mut child, pipes) = match Launcher::spawn(&config.command) {
            Ok(spawned) => spawned,
            Err(source) => {
                let err = SupervisorError::Spawn(source);
                tracing::error!(command = %config.command, error = %err, "Spawn failed");
                report(&mut stderr, &err).await;
                log_or_warn(log.error(err.to_string()).await);
                close_log(&log).await;
                lifecycle.advance(LifecycleState::Exited);
                return Exit::from(&err);
            }
        };
        lifecycle.advance(LifecycleState::Running);
        log_or_warn(
            log.info(format!("Started {} (pid {})", config.command, child.pid()))
                .await,
        );

        let stop_input = Shutdown::new();
        let shutdown = Shutdown::new();
        let chunk_size = config.relay.chunk_size;

        let stdout_task = tokio::spawn(
            StreamTap::new(LogTag::Stdout, pipes.stdout, stdout, log.clone(), chunk_size).run(),
        );
        let stderr_task = tokio::spawn(
            StreamTap::new(LogTag::Stderr, pipes.stderr, stderr, log.clone(), chunk_size).run(),
        );
        let stdin_task = tokio::spawn(
            StreamTap::new(LogTag::Stdin, stdin, pipes.stdin, log.clone(), chunk_size)
                .with_shutdown(stop_input.subscribe())
                .run(),
        );

        let forward = config
            .signals
            .forward
            .iter()
            .filter_map(|name| CatalogSignal::from_name(name));
        let forwarder = SignalForwarder::new(child.target(), log.clone(), forward);
        let forwarder_task = tokio::spawn(forwarder.run(signal_rx, shutdown.subscribe()));

        let status = child.wait().await;
        lifecycle.advance(LifecycleState::Draining);
        tracing::info!(pid = child.pid(), status = ?status, "Child terminated");

        // No new input once the child is gone; its output is drained to EOF.
        stop_input.trigger();
        join_tap(stdin_task).await;
        join_tap(stdout_task).await;
        join_tap(stderr_task).await;
        shutdown.trigger();
        match forwarder_task.await {
            Ok(report) => tracing::debug!(?report, "Forwarder joined"),
            Err(err) => tracing::error!(error = %err, "Signal forwarder task failed"),
        }

        let exit = match status {
            Ok(child_exit) => {
                log_or_warn(log.info(format!("Child exited with {}", child_exit)).await);
                Exit::from(child_exit)
            }
            Err(err) => {
                log_or_warn(log.error(format!("Failed to wait for child: {}", err)).await);
                Exit::failure()
            }
        };

        close_log(&log).await;
        lifecycle.advance(LifecycleState::Exited);
        tracing::debug!(code = exit.code(), "Supervisor finished");
        exit
    }
}

async fn join_tap(task: JoinHandle<TapReport>) {
    match task.await {
        Ok(report) => tracing::debug!(
            stream = report.tag.name(),
            bytes = report.bytes,
            outcome = ?report.outcome,
            "Tap joined"
        ),
        Err(err) => tracing::error!(error = %err, "Tap task failed"),
    }
}

async fn report<W: AsyncWrite + Unpin>(stderr: &mut W, err: &SupervisorError) {
    let message = format!("{}\n", err);
    if stderr.write_all(message.as_bytes()).await.is_err() || stderr.flush().await.is_err() {
        tracing::warn!(error = %err, "Could not report error on stderr");
    }
}

async fn close_log(log: &LogSink) {
    if let Err(err) = log.close().await {
        tracing::warn!(error = %err, "Failed to close log");
    }
}

fn log_or_warn(result: Result<(), crate::logsink::LogSinkError>) {
    if let Err(err) = result {
        tracing::warn!(error = %err, "Failed to write log entry");
    }
}
