//! Signal delivery to the live child.

use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::signals::{CatalogSignal, SignalDeliveryError, SignalTarget};

/// Reference to the child used by the signal forwarder.
///
/// Cloned out of the [`ChildHandle`](crate::process::ChildHandle); it does
/// not own the process. Once the child has been reaped, delivery is refused
/// so a recycled PID is never signalled.
#[derive(Debug, Clone)]
pub struct ChildTarget {
    pid: Pid,
    alive: Arc<AtomicBool>,
}

impl ChildTarget {
    pub fn new(pid: u32) -> Self {
        Self {
            pid: Pid::from_raw(pid as i32),
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn pid(&self) -> i32 {
        self.pid.as_raw()
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    pub(crate) fn mark_exited(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}

impl SignalTarget for ChildTarget {
    fn deliver(&self, signal: CatalogSignal) -> Result<(), SignalDeliveryError> {
        if !self.is_alive() {
            return Err(SignalDeliveryError::ChildExited { pid: self.pid() });
        }

        let raw = signal
            .raw()
            .ok_or(SignalDeliveryError::NotSupported(signal))?;
        let nix_signal = Signal::try_from(raw)?;

        kill(self.pid, nix_signal).map_err(|errno| match errno {
            Errno::ESRCH => SignalDeliveryError::NoSuchProcess { pid: self.pid() },
            other => SignalDeliveryError::Os(other),
        })
    }
}
