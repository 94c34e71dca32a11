use std::io::Write;

use super::{Builtin, CommandError, Flow};
use crate::core::state::ShellState;

#[derive(Clone)]
pub struct ExitCommand;

impl Default for ExitCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl ExitCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Builtin for ExitCommand {
    fn execute(
        &self,
        _args: &[String],
        _state: &mut ShellState,
        _out: &mut dyn Write,
    ) -> Result<Flow, CommandError> {
        Ok(Flow::Exit)
    }
}
