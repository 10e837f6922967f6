//! Child termination status.

use std::fmt;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

/// How the child terminated. Reported exactly once, by [`ChildHandle::wait`].
///
/// [`ChildHandle::wait`]: crate::process::ChildHandle::wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildExit {
    /// Normal exit with the given code.
    Code(i32),
    /// Killed by the given signal number.
    Signal(i32),
}

impl ChildExit {
    /// Exit code the supervisor reproduces: the code verbatim, or `128 + signo`.
    pub fn exit_code(self) -> i32 {
        match self {
            ChildExit::Code(code) => code,
            ChildExit::Signal(signo) => 128 + signo,
        }
    }
}

impl From<ExitStatus> for ChildExit {
    fn from(status: ExitStatus) -> Self {
        match (status.code(), status.signal()) {
            (Some(code), _) => ChildExit::Code(code),
            (None, Some(signo)) => ChildExit::Signal(signo),
            (None, None) => ChildExit::Code(1),
        }
    }
}

impl fmt::Display for ChildExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildExit::Code(code) => write!(f, "exit code {}", code),
            ChildExit::Signal(signo) => {
                match crate::signals::CatalogSignal::from_raw(*signo) {
                    Some(signal) => write!(f, "signal {} ({})", signo, signal),
                    None => write!(f, "signal {}", signo),
                }
            }
        }
    }
}
