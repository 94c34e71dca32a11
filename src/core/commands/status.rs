use std::io::Write;

use super::{Builtin, CommandError, Flow};
use crate::core::state::ShellState;

/// Prints the last foreground status, then resets it to `exit value 0`.
#[derive(Clone)]
pub struct StatusCommand;

impl Default for StatusCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Builtin for StatusCommand {
    fn execute(
        &self,
        _args: &[String],
        state: &mut ShellState,
        out: &mut dyn Write,
    ) -> Result<Flow, CommandError> {
        let status = state.take_last_status();
        writeln!(out, "{}", status)?;
        out.flush()?;
        Ok(Flow::Continue)
    }
}
