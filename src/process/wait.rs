use std::io;

use libc::{c_int, WEXITSTATUS, WIFEXITED, WIFSIGNALED, WNOHANG, WTERMSIG};

use super::{cerr, ProcessId};

/// Error values returned by [`ProcessId::wait`].
#[derive(Debug)]
pub enum WaitError {
    /// The child has not changed state yet. Only returned with [`WaitOptions::no_hang`].
    NotReady,
    Io(io::Error),
}

/// Options to configure how [`ProcessId::wait`] waits for a child.
#[derive(Debug, Clone, Copy)]
pub struct WaitOptions {
    flags: c_int,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl WaitOptions {
    /// Block until the child terminates.
    pub const fn new() -> Self {
        Self { flags: 0 }
    }

    /// Return immediately if the child has not terminated.
    pub const fn no_hang(mut self) -> Self {
        self.flags |= WNOHANG;
        self
    }
}

impl ProcessId {
    /// Wait for this specific child to change state.
    pub fn wait(self, options: WaitOptions) -> Result<WaitStatus, WaitError> {
        let mut status: c_int = 0;

        // SAFETY: `status` is a valid out pointer for the duration of the call.
        let pid = cerr(unsafe { libc::waitpid(self.id(), &mut status, options.flags) })
            .map_err(WaitError::Io)?;

        if pid == 0 && options.flags & WNOHANG != 0 {
            return Err(WaitError::NotReady);
        }

        Ok(WaitStatus { status })
    }
}

/// Raw status word reported by `waitpid`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct WaitStatus {
    status: c_int,
}

impl std::fmt::Debug for WaitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(code) = self.exit_status() {
            write!(f, "ExitStatus({code})")
        } else if let Some(signal) = self.term_signal() {
            write!(f, "TermSignal({})", super::signal::signal_name(signal))
        } else {
            write!(f, "Unknown({})", self.status)
        }
    }
}

impl WaitStatus {
    pub const fn did_exit(&self) -> bool {
        WIFEXITED(self.status)
    }

    pub const fn exit_status(&self) -> Option<c_int> {
        if self.did_exit() {
            Some(WEXITSTATUS(self.status))
        } else {
            None
        }
    }

    pub const fn was_signaled(&self) -> bool {
        WIFSIGNALED(self.status)
    }

    pub const fn term_signal(&self) -> Option<c_int> {
        if self.was_signaled() {
            Some(WTERMSIG(self.status))
        } else {
            None
        }
    }

    /// `true` once the child is gone for good, by exit or by signal.
    pub const fn is_terminated(&self) -> bool {
        self.did_exit() || self.was_signaled()
    }
}
