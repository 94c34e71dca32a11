use std::io::{self, Write};

mod executor;

use crate::{
    core::{
        commands::{BuiltinDispatcher, Flow},
        config::Config,
        state::ShellState,
    },
    error::ShellError,
    flags::Flags,
    input::{self, LineReader},
    process::{JobSupervisor, ProcessLauncher},
};

pub(crate) use executor::CommandHandler;

pub const PROMPT: &str = ": ";

pub struct Shell {
    pub(crate) reader: Box<dyn LineReader>,
    pub(crate) out: Box<dyn Write>,
    pub(crate) config: Config,
    pub(crate) state: ShellState,
    pub(crate) builtins: BuiltinDispatcher,
    pub(crate) launcher: ProcessLauncher,
    pub(crate) jobs: JobSupervisor,
}

impl Shell {
    pub fn new(flags: &Flags) -> Result<Self, ShellError> {
        let reader = input::stdin_reader()?;
        Ok(Self::with_io(flags, reader, Box::new(io::stdout())))
    }

    pub fn with_io(flags: &Flags, reader: Box<dyn LineReader>, out: Box<dyn Write>) -> Self {
        Shell {
            reader,
            out,
            config: Config::new(flags.get_value("config").map(String::as_str)),
            state: ShellState::new(),
            builtins: BuiltinDispatcher::new(),
            launcher: ProcessLauncher::new(),
            jobs: JobSupervisor::new(),
        }
    }

    /// Read-eval loop. Returns once `exit` runs or input ends.
    pub fn run(&mut self) -> Result<(), ShellError> {
        let disposition = self.state.disposition();
        disposition.apply()?;
        if disposition.is_current()? {
            log::debug!("shell runs under the {} disposition", disposition.name());
        } else {
            log::warn!("the {} SIGINT disposition did not take effect", disposition.name());
        }

        for line in self.config.startup_lines()? {
            if self.execute_line(&line)? == Flow::Exit {
                return self.finish();
            }
        }

        loop {
            self.jobs.sweep(&mut *self.out)?;

            let Some(line) = self.reader.read_line(PROMPT)? else {
                break;
            };
            // Jobs that finished while the prompt was waiting.
            self.jobs.sweep(&mut *self.out)?;
            if self.execute_line(&line)? == Flow::Exit {
                break;
            }
        }
        self.finish()
    }

    fn finish(&mut self) -> Result<(), ShellError> {
        self.jobs.sweep(&mut *self.out)?;
        for pid in self.jobs.outstanding() {
            log::debug!("leaving background pid {} running", pid);
        }
        self.out.flush()?;
        Ok(())
    }
}
