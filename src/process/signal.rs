use std::ptr;

use libc::{c_int, sighandler_t, SIG_DFL, SIG_IGN};
use signal_hook::consts::{SIGINT, SIGPIPE};

use super::{cerr, ProcessError};

/// A fixed SIGINT disposition.
///
/// The shell never mutates a disposition in place: it picks one of the two
/// named configurations and applies it to the calling process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disposition {
    name: &'static str,
    handler: sighandler_t,
}

impl Disposition {
    /// SIGINT terminates the process.
    pub const FOREGROUND: Disposition = Disposition {
        name: "foreground",
        handler: SIG_DFL,
    };

    /// SIGINT is ignored. Unlike a handler, this survives `execvp`.
    pub const BACKGROUND: Disposition = Disposition {
        name: "background",
        handler: SIG_IGN,
    };

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Install this disposition for SIGINT in the calling process.
    ///
    /// Only calls `sigemptyset` and `sigaction`, so it is safe to use between
    /// `fork` and `exec`.
    pub fn apply(&self) -> Result<(), ProcessError> {
        install(SIGINT, self.handler)
    }

    pub fn is_current(&self) -> Result<bool, ProcessError> {
        Ok(current_handler(SIGINT)? == self.handler)
    }
}

/// The Rust runtime ignores SIGPIPE before `main`. A raw `fork` + `execvp`
/// would hand that on to every program, so children reset it to default.
///
/// Async-signal-safe, like [`Disposition::apply`].
pub fn restore_runtime_defaults() -> Result<(), ProcessError> {
    install(SIGPIPE, SIG_DFL)
}

fn install(signal: c_int, handler: sighandler_t) -> Result<(), ProcessError> {
    let mut action = make_zeroed_sigaction();
    action.sa_sigaction = handler;
    action.sa_flags = 0;

    // SAFETY: `action` is a valid, fully initialised sigaction and the old
    // action pointer may be null.
    unsafe {
        libc::sigemptyset(&mut action.sa_mask);
        cerr(libc::sigaction(signal, &action, ptr::null_mut())).map_err(ProcessError::Signal)?;
    }
    Ok(())
}

fn current_handler(signal: c_int) -> Result<sighandler_t, ProcessError> {
    let mut old = make_zeroed_sigaction();
    // SAFETY: a null new action only queries the current one.
    unsafe {
        cerr(libc::sigaction(signal, ptr::null(), &mut old)).map_err(ProcessError::Signal)?;
    }
    Ok(old.sa_sigaction)
}

/// Human readable name for a signal number, for log lines.
pub fn signal_name(signal: libc::c_int) -> &'static str {
    signal_hook::low_level::signal_name(signal).unwrap_or("unknown signal")
}

fn make_zeroed_sigaction() -> libc::sigaction {
    // SAFETY: sigaction is a C struct for which all-zeroes is a valid value.
    unsafe { std::mem::zeroed() }
}
