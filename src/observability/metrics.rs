//! Metrics collection.
//!
//! # Metrics
//! - `supervisor_relay_bytes_total` (counter): bytes relayed, by stream
//! - `supervisor_relay_chunks_total` (counter): chunks relayed, by stream
//! - `supervisor_signals_received_total` (counter): by signal
//! - `supervisor_signals_forwarded_total` (counter): by signal
//! - `supervisor_signal_delivery_failures_total` (counter): by signal
//!
//! # Design Decisions
//! - No exporter is installed here; an embedding application may install one
//! - Labels are static strings

use crate::logsink::LogTag;
use crate::signals::CatalogSignal;

pub fn record_relay_chunk(tag: LogTag, bytes: usize) {
    metrics::counter!("supervisor_relay_bytes_total", "stream" => tag.name()).increment(bytes as u64);
    metrics::counter!("supervisor_relay_chunks_total", "stream" => tag.name()).increment(1);
}

pub fn record_signal_received(signal: CatalogSignal) {
    metrics::counter!("supervisor_signals_received_total", "signal" => signal.name()).increment(1);
}

pub fn record_signal_forwarded(signal: CatalogSignal) {
    metrics::counter!("supervisor_signals_forwarded_total", "signal" => signal.name()).increment(1);
}

pub fn record_signal_delivery_failure(signal: CatalogSignal) {
    metrics::counter!("supervisor_signal_delivery_failures_total", "signal" => signal.name())
        .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_util::debugging::{DebugValue, DebuggingRecorder};

    fn counter(snapshot: &[(String, String, u64)], name: &str, label: &str) -> Option<u64> {
        snapshot
            .iter()
            .find(|(n, l, _)| n == name && l == label)
            .map(|(_, _, value)| *value)
    }

    fn capture(record: impl FnOnce()) -> Vec<(String, String, u64)> {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();
        metrics::with_local_recorder(&recorder, record);

        snapshotter
            .snapshot()
            .into_vec()
            .into_iter()
            .filter_map(|(key, _, _, value)| match value {
                DebugValue::Counter(count) => {
                    let label = key
                        .key()
                        .labels()
                        .map(|label| label.value().to_string())
                        .collect::<Vec<_>>()
                        .join(",");
                    Some((key.key().name().to_string(), label, count))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn relay_chunks_count_bytes_per_stream() {
        let snapshot = capture(|| {
            record_relay_chunk(LogTag::Stdout, 100);
            record_relay_chunk(LogTag::Stdout, 28);
            record_relay_chunk(LogTag::Stdin, 5);
        });

        assert_eq!(counter(&snapshot, "supervisor_relay_bytes_total", "stdout"), Some(128));
        assert_eq!(counter(&snapshot, "supervisor_relay_chunks_total", "stdout"), Some(2));
        assert_eq!(counter(&snapshot, "supervisor_relay_bytes_total", "stdin"), Some(5));
        assert_eq!(counter(&snapshot, "supervisor_relay_bytes_total", "stderr"), None);
    }

    #[test]
    fn signal_counters_are_labelled_by_name() {
        let snapshot = capture(|| {
            record_signal_received(CatalogSignal::Int);
            record_signal_forwarded(CatalogSignal::Int);
            record_signal_received(CatalogSignal::Winch);
            record_signal_delivery_failure(CatalogSignal::Term);
        });

        assert_eq!(counter(&snapshot, "supervisor_signals_received_total", "SIGINT"), Some(1));
        assert_eq!(counter(&snapshot, "supervisor_signals_forwarded_total", "SIGINT"), Some(1));
        assert_eq!(counter(&snapshot, "supervisor_signals_received_total", "SIGWINCH"), Some(1));
        assert_eq!(counter(&snapshot, "supervisor_signals_forwarded_total", "SIGWINCH"), None);
        assert_eq!(
            counter(&snapshot, "supervisor_signal_delivery_failures_total", "SIGTERM"),
            Some(1)
        );
    }
}
