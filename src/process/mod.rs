use std::fmt;
use std::io;

pub mod jobs;
pub mod launcher;
pub mod signal;
pub mod wait;

pub use jobs::JobSupervisor;
pub use launcher::ProcessLauncher;
pub use signal::Disposition;

/// OS process identifier of a child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProcessId(pub libc::pid_t);

impl ProcessId {
    pub const fn id(&self) -> libc::pid_t {
        self.0
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether the shell waits for a child before prompting again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Foreground,
    Background,
}

#[derive(Debug)]
pub enum ProcessError {
    Fork(io::Error),
    Wait(io::Error),
    Signal(io::Error),
    InvalidArgument(String),
    EmptyCommand,
    Output(io::Error),
}

impl From<io::Error> for ProcessError {
    fn from(e: io::Error) -> Self {
        ProcessError::Output(e)
    }
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::Fork(e) => write!(f, "fork failed: {}", e),
            ProcessError::Wait(e) => write!(f, "wait failed: {}", e),
            ProcessError::Signal(e) => write!(f, "cannot set signal disposition: {}", e),
            ProcessError::InvalidArgument(arg) => {
                write!(f, "{}: argument contains a nul byte", arg)
            }
            ProcessError::EmptyCommand => write!(f, "empty command"),
            ProcessError::Output(e) => write!(f, "cannot write to standard output: {}", e),
        }
    }
}

impl std::error::Error for ProcessError {}

/// Turn the `-1` convention of libc calls into an `io::Result`.
pub(crate) fn cerr<Int: Copy + TryInto<libc::c_long>>(res: Int) -> io::Result<Int> {
    match res.try_into() {
        Ok(-1) => Err(io::Error::last_os_error()),
        _ => Ok(res),
    }
}
