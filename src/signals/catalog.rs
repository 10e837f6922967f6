//! The enumerated catalog of signals the supervisor tries to intercept.

use std::fmt;

/// One entry of the signal catalog.
///
/// The catalog is fixed; whether an entry maps to a real signal depends on
/// the platform (see [`CatalogSignal::raw`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogSignal {
    Abrt,
    Alrm,
    Bus,
    Chld,
    Cont,
    Fpe,
    Hup,
    Ill,
    Int,
    Io,
    Iot,
    Kill,
    Pipe,
    Poll,
    Prof,
    Pwr,
    Quit,
    Segv,
    StkFlt,
    Stop,
    Sys,
    Term,
    Trap,
    Tstp,
    Ttin,
    Ttou,
    Unused,
    Urg,
    Usr1,
    Usr2,
    VtAlrm,
    Winch,
    XCpu,
    XFsz,
}

impl CatalogSignal {
    /// Every catalog entry, in subscription order.
    pub const ALL: [CatalogSignal; 34] = [
        CatalogSignal::Abrt,
        CatalogSignal::Alrm,
        CatalogSignal::Bus,
        CatalogSignal::Chld,
        CatalogSignal::Cont,
        CatalogSignal::Fpe,
        CatalogSignal::Hup,
        CatalogSignal::Ill,
        CatalogSignal::Int,
        CatalogSignal::Io,
        CatalogSignal::Iot,
        CatalogSignal::Kill,
        CatalogSignal::Pipe,
        CatalogSignal::Poll,
        CatalogSignal::Prof,
        CatalogSignal::Pwr,
        CatalogSignal::Quit,
        CatalogSignal::Segv,
        CatalogSignal::StkFlt,
        CatalogSignal::Stop,
        CatalogSignal::Sys,
        CatalogSignal::Term,
        CatalogSignal::Trap,
        CatalogSignal::Tstp,
        CatalogSignal::Ttin,
        CatalogSignal::Ttou,
        CatalogSignal::Unused,
        CatalogSignal::Urg,
        CatalogSignal::Usr1,
        CatalogSignal::Usr2,
        CatalogSignal::VtAlrm,
        CatalogSignal::Winch,
        CatalogSignal::XCpu,
        CatalogSignal::XFsz,
    ];

    /// Signals relayed to the child when no configuration overrides it.
    pub const DEFAULT_FORWARDED: [CatalogSignal; 4] = [
        CatalogSignal::Hup,
        CatalogSignal::Int,
        CatalogSignal::Quit,
        CatalogSignal::Term,
    ];

    /// Conventional name, e.g. `SIGINT`.
    pub fn name(self) -> &'static str {
        match self {
            CatalogSignal::Abrt => "SIGABRT",
            CatalogSignal::Alrm => "SIGALRM",
            CatalogSignal::Bus => "SIGBUS",
            CatalogSignal::Chld => "SIGCHLD",
            CatalogSignal::Cont => "SIGCONT",
            CatalogSignal::Fpe => "SIGFPE",
            CatalogSignal::Hup => "SIGHUP",
            CatalogSignal::Ill => "SIGILL",
            CatalogSignal::Int => "SIGINT",
            CatalogSignal::Io => "SIGIO",
            CatalogSignal::Iot => "SIGIOT",
            CatalogSignal::Kill => "SIGKILL",
            CatalogSignal::Pipe => "SIGPIPE",
            CatalogSignal::Poll => "SIGPOLL",
            CatalogSignal::Prof => "SIGPROF",
            CatalogSignal::Pwr => "SIGPWR",
            CatalogSignal::Quit => "SIGQUIT",
            CatalogSignal::Segv => "SIGSEGV",
            CatalogSignal::StkFlt => "SIGSTKFLT",
            CatalogSignal::Stop => "SIGSTOP",
            CatalogSignal::Sys => "SIGSYS",
            CatalogSignal::Term => "SIGTERM",
            CatalogSignal::Trap => "SIGTRAP",
            CatalogSignal::Tstp => "SIGTSTP",
            CatalogSignal::Ttin => "SIGTTIN",
            CatalogSignal::Ttou => "SIGTTOU",
            CatalogSignal::Unused => "SIGUNUSED",
            CatalogSignal::Urg => "SIGURG",
            CatalogSignal::Usr1 => "SIGUSR1",
            CatalogSignal::Usr2 => "SIGUSR2",
            CatalogSignal::VtAlrm => "SIGVTALRM",
            CatalogSignal::Winch => "SIGWINCH",
            CatalogSignal::XCpu => "SIGXCPU",
            CatalogSignal::XFsz => "SIGXFSZ",
        }
    }

    /// Look up an entry by name. Case-insensitive; the `SIG` prefix is optional.
    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.trim().to_ascii_uppercase();
        let wanted = upper.strip_prefix("SIG").unwrap_or(&upper);
        Self::ALL
            .into_iter()
            .find(|signal| &signal.name()[3..] == wanted)
    }

    /// Platform signal number, or `None` when this host has no such signal.
    pub fn raw(self) -> Option<i32> {
        let raw = match self {
            CatalogSignal::Abrt => libc::SIGABRT,
            CatalogSignal::Alrm => libc::SIGALRM,
            CatalogSignal::Bus => libc::SIGBUS,
            CatalogSignal::Chld => libc::SIGCHLD,
            CatalogSignal::Cont => libc::SIGCONT,
            CatalogSignal::Fpe => libc::SIGFPE,
            CatalogSignal::Hup => libc::SIGHUP,
            CatalogSignal::Ill => libc::SIGILL,
            CatalogSignal::Int => libc::SIGINT,
            CatalogSignal::Io => libc::SIGIO,
            // Historical alias of SIGABRT.
            CatalogSignal::Iot => libc::SIGABRT,
            CatalogSignal::Kill => libc::SIGKILL,
            CatalogSignal::Pipe => libc::SIGPIPE,
            CatalogSignal::Poll => return poll_signal(),
            CatalogSignal::Prof => libc::SIGPROF,
            CatalogSignal::Pwr => return power_signal(),
            CatalogSignal::Quit => libc::SIGQUIT,
            CatalogSignal::Segv => libc::SIGSEGV,
            CatalogSignal::StkFlt => return stack_fault_signal(),
            CatalogSignal::Stop => libc::SIGSTOP,
            CatalogSignal::Sys => libc::SIGSYS,
            CatalogSignal::Term => libc::SIGTERM,
            CatalogSignal::Trap => libc::SIGTRAP,
            CatalogSignal::Tstp => libc::SIGTSTP,
            CatalogSignal::Ttin => libc::SIGTTIN,
            CatalogSignal::Ttou => libc::SIGTTOU,
            // Removed from modern kernels and libcs.
            CatalogSignal::Unused => return None,
            CatalogSignal::Urg => libc::SIGURG,
            CatalogSignal::Usr1 => libc::SIGUSR1,
            CatalogSignal::Usr2 => libc::SIGUSR2,
            CatalogSignal::VtAlrm => libc::SIGVTALRM,
            CatalogSignal::Winch => libc::SIGWINCH,
            CatalogSignal::XCpu => libc::SIGXCPU,
            CatalogSignal::XFsz => libc::SIGXFSZ,
        };
        Some(raw)
    }

    /// Reverse lookup of [`CatalogSignal::raw`]; the first catalog entry wins for aliases.
    pub fn from_raw(raw: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|signal| signal.raw() == Some(raw))
    }

    /// The catalog entry that owns this signal's number; `SIGIOT` becomes
    /// `SIGABRT`. Unavailable signals map to themselves.
    pub fn canonical(self) -> Self {
        self.raw().and_then(Self::from_raw).unwrap_or(self)
    }
}

impl fmt::Display for CatalogSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn poll_signal() -> Option<i32> {
    // SIGPOLL is SIGIO under another name on Linux.
    Some(libc::SIGIO)
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn poll_signal() -> Option<i32> {
    None
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn power_signal() -> Option<i32> {
    Some(libc::SIGPWR)
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn power_signal() -> Option<i32> {
    None
}

#[cfg(all(
    any(target_os = "linux", target_os = "android"),
    not(any(target_arch = "mips", target_arch = "mips64", target_arch = "sparc64"))
))]
fn stack_fault_signal() -> Option<i32> {
    Some(libc::SIGSTKFLT)
}

#[cfg(not(all(
    any(target_os = "linux", target_os = "android"),
    not(any(target_arch = "mips", target_arch = "mips64", target_arch = "sparc64"))
)))]
fn stack_fault_signal() -> Option<i32> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_has_unique_names() {
        let names: HashSet<&str> = CatalogSignal::ALL.iter().map(|s| s.name()).collect();
        assert_eq!(names.len(), CatalogSignal::ALL.len());
        assert!(names.iter().all(|name| name.starts_with("SIG")));
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(CatalogSignal::from_name("SIGINT"), Some(CatalogSignal::Int));
        assert_eq!(CatalogSignal::from_name("term"), Some(CatalogSignal::Term));
        assert_eq!(CatalogSignal::from_name(" sigwinch "), Some(CatalogSignal::Winch));
        assert_eq!(CatalogSignal::from_name("SIGNOPE"), None);
        assert_eq!(CatalogSignal::from_name(""), None);
    }

    #[test]
    fn forwarded_defaults_map_to_posix_numbers() {
        let raws: Vec<i32> = CatalogSignal::DEFAULT_FORWARDED
            .iter()
            .filter_map(|s| s.raw())
            .collect();
        assert_eq!(raws, vec![libc::SIGHUP, libc::SIGINT, libc::SIGQUIT, libc::SIGTERM]);
    }

    #[test]
    fn aliases_resolve_to_first_entry() {
        assert_eq!(CatalogSignal::Iot.raw(), CatalogSignal::Abrt.raw());
        assert_eq!(CatalogSignal::from_raw(libc::SIGABRT), Some(CatalogSignal::Abrt));
        assert_eq!(CatalogSignal::from_raw(libc::SIGUSR2), Some(CatalogSignal::Usr2));
    }

    #[test]
    fn unused_is_never_deliverable() {
        assert_eq!(CatalogSignal::Unused.raw(), None);
    }

    #[test]
    fn aliases_share_a_canonical_entry() {
        assert_eq!(CatalogSignal::Iot.canonical(), CatalogSignal::Abrt);
        assert_eq!(CatalogSignal::Term.canonical(), CatalogSignal::Term);
        assert_eq!(CatalogSignal::Unused.canonical(), CatalogSignal::Unused);
    }
}
