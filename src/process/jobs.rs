use std::collections::BTreeSet;
use std::io::{self, Write};

use super::wait::{WaitError, WaitOptions, WaitStatus};
use super::{ProcessError, ProcessId};
use crate::core::state::LastStatus;

/// Waits for foreground children and keeps the registry of background ones.
#[derive(Debug, Default)]
pub struct JobSupervisor {
    background: BTreeSet<ProcessId>,
}

impl JobSupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Background pids that have not been reaped yet.
    pub fn outstanding(&self) -> impl Iterator<Item = ProcessId> + '_ {
        self.background.iter().copied()
    }

    /// Block until `pid` terminates and return its status. A death by signal
    /// is announced on `out` right away.
    pub fn wait_foreground(
        &mut self,
        pid: ProcessId,
        out: &mut dyn Write,
    ) -> Result<LastStatus, ProcessError> {
        let status = loop {
            match pid.wait(WaitOptions::new()) {
                Ok(status) => {
                    if let Some(status) = LastStatus::from_wait(status) {
                        break status;
                    }
                }
                Err(WaitError::Io(e)) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(WaitError::Io(e)) => return Err(ProcessError::Wait(e)),
                Err(WaitError::NotReady) => continue,
            }
        };

        log::debug!("foreground pid {} finished: {}", pid, status);
        if let LastStatus::Signaled(_) = status {
            writeln!(out, "{}", status)?;
            out.flush()?;
        }
        Ok(status)
    }

    /// Announce a freshly launched background child and start tracking it.
    pub fn track_background(&mut self, pid: ProcessId, out: &mut dyn Write) -> Result<(), ProcessError> {
        writeln!(out, "background pid is {}", pid)?;
        out.flush()?;
        self.background.insert(pid);
        Ok(())
    }

    /// One non-blocking wait per tracked child. Every finished child is
    /// reported and forgotten; returns how many were reaped.
    pub fn sweep(&mut self, out: &mut dyn Write) -> Result<usize, ProcessError> {
        let mut reaped = 0;

        for pid in self.background.clone() {
            match pid.wait(WaitOptions::new().no_hang()) {
                Ok(status) => {
                    if let Some(done) = Self::completion(status) {
                        writeln!(out, "background pid {} is done: {}.", pid, done)?;
                        log::debug!("reaped background pid {}: {:?}", pid, status);
                        self.background.remove(&pid);
                        reaped += 1;
                    }
                }
                Err(WaitError::NotReady) => {}
                Err(WaitError::Io(e)) if e.raw_os_error() == Some(libc::ECHILD) => {
                    log::warn!("background pid {} vanished before it was reaped", pid);
                    self.background.remove(&pid);
                }
                Err(WaitError::Io(e)) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(WaitError::Io(e)) => return Err(ProcessError::Wait(e)),
            }
        }

        if reaped > 0 {
            out.flush()?;
        }
        Ok(reaped)
    }

    fn completion(status: WaitStatus) -> Option<LastStatus> {
        if status.is_terminated() {
            LastStatus::from_wait(status)
        } else {
            None
        }
    }
}
