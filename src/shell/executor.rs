use crate::core::commands::{CommandError, Flow};
use crate::core::parser::{self, Command, ParseError};
use crate::core::state::LastStatus;
use crate::error::ShellError;
use crate::process::{Mode, ProcessError};
use std::io::Write;

pub(crate) trait CommandHandler {
    fn execute_line(&mut self, line: &str) -> Result<Flow, ShellError>;
    fn launch(&mut self, command: &Command) -> Result<Flow, ShellError>;
}

impl CommandHandler for super::Shell {
    fn execute_line(&mut self, line: &str) -> Result<Flow, ShellError> {
        if parser::is_ignorable(line) {
            return Ok(Flow::Continue);
        }

        let command = match parser::parse(line) {
            Ok(command) => command,
            Err(ParseError::Empty) => return Ok(Flow::Continue),
            Err(e) => {
                eprintln!("smallsh: {}", e);
                return Ok(Flow::Continue);
            }
        };

        // Built-ins ignore `&` and always run here, synchronously.
        let args = &command.args[1..];
        match self
            .builtins
            .execute(command.program(), args, &mut self.state, &mut *self.out)
        {
            Some(Ok(flow)) => Ok(flow),
            Some(Err(CommandError::IoError(e))) => Err(e.into()),
            Some(Err(e @ CommandError::NoSuchDirectory(_))) => {
                writeln!(self.out, "{}", e)?;
                self.out.flush()?;
                Ok(Flow::Continue)
            }
            Some(Err(e)) => {
                eprintln!("{}", e);
                Ok(Flow::Continue)
            }
            None => self.launch(&command),
        }
    }

    fn launch(&mut self, command: &Command) -> Result<Flow, ShellError> {
        let pid = match self.launcher.launch(command) {
            Ok(pid) => pid,
            Err(e @ ProcessError::InvalidArgument(_)) => {
                eprintln!("smallsh: {}", e);
                if command.mode() == Mode::Foreground {
                    self.state.set_last_status(LastStatus::FAILURE);
                }
                return Ok(Flow::Continue);
            }
            Err(e) => return Err(e.into()),
        };

        match command.mode() {
            Mode::Foreground => {
                let status = self.jobs.wait_foreground(pid, &mut *self.out)?;
                self.state.set_last_status(status);
            }
            Mode::Background => self.jobs.track_background(pid, &mut *self.out)?,
        }

        self.jobs.sweep(&mut *self.out)?;
        Ok(Flow::Continue)
    }
}
