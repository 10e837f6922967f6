//! Logs intercepted signals and relays the forwarding subset to the child.

use std::collections::HashSet;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc};

use crate::logsink::LogSink;
use crate::observability::metrics;
use crate::signals::{CatalogSignal, SignalEvent};

/// Failure to deliver a signal to the child. Never fatal.
#[derive(Debug, Error)]
pub enum SignalDeliveryError {
    #[error("child process {pid} has already exited")]
    ChildExited { pid: i32 },

    #[error("no such process {pid}")]
    NoSuchProcess { pid: i32 },

    #[error("{0} is not available on this platform")]
    NotSupported(CatalogSignal),

    #[error("kill failed: {0}")]
    Os(#[from] nix::errno::Errno),
}

/// Something a signal can be relayed to.
pub trait SignalTarget: Send + Sync {
    fn deliver(&self, signal: CatalogSignal) -> Result<(), SignalDeliveryError>;
}

/// Counters returned when the forwarder stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForwarderReport {
    pub received: u64,
    pub forwarded: u64,
    pub failed: u64,
}

/// Consumes signal events, logging each and relaying the forwarded subset.
pub struct SignalForwarder<T> {
    target: T,
    log: LogSink,
    forward: HashSet<CatalogSignal>,
    report: ForwarderReport,
}

impl<T: SignalTarget> SignalForwarder<T> {
    pub fn new(target: T, log: LogSink, forward: impl IntoIterator<Item = CatalogSignal>) -> Self {
        Self {
            target,
            log,
            forward: forward.into_iter().map(CatalogSignal::canonical).collect(),
            report: ForwarderReport::default(),
        }
    }

    /// Whether `signal`, or an alias sharing its number, is relayed.
    pub fn forwards(&self, signal: CatalogSignal) -> bool {
        self.forward.contains(&signal.canonical())
    }

    /// Run until the event channel closes or shutdown is triggered.
    ///
    /// Events already queued when shutdown fires are still handled.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<SignalEvent>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> ForwarderReport {
        loop {
            tokio::select! {
                biased;
                event = events.recv() => match event {
                    Some(event) => self.handle(event).await,
                    None => break,
                },
                _ = shutdown.recv() => {
                    while let Ok(event) = events.try_recv() {
                        self.handle(event).await;
                    }
                    break;
                }
            }
        }

        tracing::debug!(
            received = self.report.received,
            forwarded = self.report.forwarded,
            failed = self.report.failed,
            "Signal forwarder stopped"
        );
        self.report
    }

    async fn handle(&mut self, event: SignalEvent) {
        let signal = event.signal;
        let forwarded = self.forwards(signal);
        self.report.received += 1;
        metrics::record_signal_received(signal);

        let entry = if forwarded {
            format!("{} received, forwarding to child process.", signal)
        } else {
            format!("{} received.", signal)
        };
        if let Err(err) = self.log.signal(entry).await {
            tracing::warn!(%signal, error = %err, "Failed to log signal");
        }

        if !forwarded {
            tracing::debug!(%signal, "Signal logged, not forwarded");
            return;
        }

        match self.target.deliver(signal) {
            Ok(()) => {
                self.report.forwarded += 1;
                metrics::record_signal_forwarded(signal);
                tracing::info!(%signal, "Signal forwarded to child");
            }
            Err(err) => {
                self.report.failed += 1;
                metrics::record_signal_delivery_failure(signal);
                tracing::warn!(%signal, error = %err, "Signal delivery failed");
                if let Err(log_err) = self
                    .log
                    .error(format!("Failed to forward {} to child process: {}", signal, err))
                    .await
                {
                    tracing::warn!(error = %log_err, "Failed to log delivery error");
                }
            }
        }
    }
}
