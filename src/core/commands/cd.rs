use std::env;
use std::io::Write;
use std::path::PathBuf;

use super::{Builtin, CommandError, Flow};
use crate::core::state::{LastStatus, ShellState};

#[derive(Clone)]
pub struct CdCommand;

impl Default for CdCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl CdCommand {
    pub fn new() -> Self {
        Self
    }

    fn target(&self, args: &[String]) -> Result<PathBuf, CommandError> {
        match args.first() {
            Some(path) => Ok(PathBuf::from(path)),
            None => dirs::home_dir().ok_or(CommandError::HomeDirNotFound),
        }
    }
}

impl Builtin for CdCommand {
    fn execute(
        &self,
        args: &[String],
        state: &mut ShellState,
        _out: &mut dyn Write,
    ) -> Result<Flow, CommandError> {
        let target = self.target(args)?;

        // chdir(2) either switches completely or not at all.
        env::set_current_dir(&target).map_err(|e| {
            log::debug!("cd {}: {}", target.display(), e);
            CommandError::NoSuchDirectory(target.display().to_string())
        })?;

        state.set_last_status(LastStatus::SUCCESS);
        Ok(Flow::Continue)
    }
}
