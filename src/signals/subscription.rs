//! Best-effort registration of the signal catalog.

use std::collections::HashSet;
use thiserror::Error;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;

use crate::signals::CatalogSignal;

/// A signal delivered to the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalEvent {
    pub signal: CatalogSignal,
}

/// Why a catalog entry was not subscribed.
#[derive(Debug, Error)]
pub enum SignalSubscribeError {
    #[error("{0} does not exist on this platform")]
    NotSupported(CatalogSignal),

    #[error("{signal} shares its number with {first}, already subscribed")]
    Duplicate {
        signal: CatalogSignal,
        first: CatalogSignal,
    },

    #[error("cannot register handler for {signal}: {source}")]
    Register {
        signal: CatalogSignal,
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of [`subscribe_all`].
#[derive(Debug, Default)]
pub struct SubscriptionReport {
    pub subscribed: Vec<CatalogSignal>,
    pub skipped: Vec<SignalSubscribeError>,
}

impl SubscriptionReport {
    pub fn is_subscribed(&self, signal: CatalogSignal) -> bool {
        self.subscribed.contains(&signal)
    }
}

/// Register a listener for each signal and feed deliveries into `events`.
///
/// Must be called from within a Tokio runtime. Each successful registration
/// spawns a task that lives until the channel closes. Failures are collected
/// in the report and otherwise ignored.
pub fn subscribe_all(
    signals: &[CatalogSignal],
    events: mpsc::Sender<SignalEvent>,
) -> SubscriptionReport {
    let mut report = SubscriptionReport::default();
    let mut seen: HashSet<i32> = HashSet::new();

    for &catalog_signal in signals {
        match register(catalog_signal, &mut seen) {
            Ok(mut stream) => {
                let events = events.clone();
                tokio::spawn(async move {
                    while stream.recv().await.is_some() {
                        let event = SignalEvent {
                            signal: catalog_signal,
                        };
                        if events.send(event).await.is_err() {
                            break;
                        }
                    }
                });
                report.subscribed.push(catalog_signal);
            }
            Err(err) => {
                tracing::trace!(error = %err, "Signal not subscribed");
                report.skipped.push(err);
            }
        }
    }

    tracing::debug!(
        subscribed = report.subscribed.len(),
        skipped = report.skipped.len(),
        "Signal catalog registered"
    );
    report
}

fn register(
    catalog_signal: CatalogSignal,
    seen: &mut HashSet<i32>,
) -> Result<tokio::signal::unix::Signal, SignalSubscribeError> {
    let raw = catalog_signal
        .raw()
        .ok_or(SignalSubscribeError::NotSupported(catalog_signal))?;

    if !seen.insert(raw) {
        let first = CatalogSignal::from_raw(raw).unwrap_or(catalog_signal);
        return Err(SignalSubscribeError::Duplicate {
            signal: catalog_signal,
            first,
        });
    }

    signal(SignalKind::from_raw(raw)).map_err(|source| SignalSubscribeError::Register {
        signal: catalog_signal,
        source,
    })
}
