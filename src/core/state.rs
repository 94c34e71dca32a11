use std::fmt;

use crate::process::wait::WaitStatus;
use crate::process::Disposition;

/// How the most recent foreground command (or status-setting built-in) ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LastStatus {
    /// Nothing has run yet.
    #[default]
    None,
    Exited(i32),
    Signaled(i32),
}

impl LastStatus {
    pub const SUCCESS: LastStatus = LastStatus::Exited(0);
    pub const FAILURE: LastStatus = LastStatus::Exited(1);

    pub fn from_wait(status: WaitStatus) -> Option<Self> {
        if let Some(code) = status.exit_status() {
            Some(LastStatus::Exited(code))
        } else {
            status.term_signal().map(LastStatus::Signaled)
        }
    }
}

impl fmt::Display for LastStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LastStatus::None => write!(f, "none"),
            LastStatus::Exited(code) => write!(f, "exit value {}", code),
            LastStatus::Signaled(signal) => write!(f, "terminated by signal {}", signal),
        }
    }
}

pub struct ShellState {
    last_status: LastStatus,
    disposition: Disposition,
}

impl Default for ShellState {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellState {
    pub fn new() -> Self {
        Self {
            last_status: LastStatus::None,
            disposition: Disposition::BACKGROUND,
        }
    }

    pub fn last_status(&self) -> LastStatus {
        self.last_status
    }

    pub fn set_last_status(&mut self, status: LastStatus) {
        self.last_status = status;
    }

    /// Return the stored status and reset it to `exit value 0`.
    pub fn take_last_status(&mut self) -> LastStatus {
        std::mem::replace(&mut self.last_status, LastStatus::SUCCESS)
    }

    /// Disposition the read-eval loop runs under.
    pub fn disposition(&self) -> Disposition {
        self.disposition
    }
}
