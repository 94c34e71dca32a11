use std::collections::BTreeMap;
use std::io::Write;

mod cd;
mod exit;
mod status;

pub use cd::CdCommand;
pub use exit::ExitCommand;
pub use status::StatusCommand;

use super::state::{LastStatus, ShellState};

#[derive(Debug)]
pub enum CommandError {
    NoSuchDirectory(String),
    HomeDirNotFound,
    IoError(std::io::Error),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::NoSuchDirectory(path) => write!(f, "{}: no such file or directory", path),
            CommandError::HomeDirNotFound => write!(f, "cd: home directory not found"),
            CommandError::IoError(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<std::io::Error> for CommandError {
    fn from(err: std::io::Error) -> Self {
        CommandError::IoError(err)
    }
}

/// What the read-eval loop does after a built-in returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub trait Builtin {
    /// `args` excludes the command name.
    fn execute(
        &self,
        args: &[String],
        state: &mut ShellState,
        out: &mut dyn Write,
    ) -> Result<Flow, CommandError>;
}

#[derive(Clone)]
enum CommandType {
    Cd(CdCommand),
    Exit(ExitCommand),
    Status(StatusCommand),
}

impl Builtin for CommandType {
    fn execute(
        &self,
        args: &[String],
        state: &mut ShellState,
        out: &mut dyn Write,
    ) -> Result<Flow, CommandError> {
        match self {
            CommandType::Cd(cmd) => cmd.execute(args, state, out),
            CommandType::Exit(cmd) => cmd.execute(args, state, out),
            CommandType::Status(cmd) => cmd.execute(args, state, out),
        }
    }
}

/// Built-ins run inside the shell process, matched on the exact command name.
#[derive(Clone)]
pub struct BuiltinDispatcher {
    commands: BTreeMap<&'static str, CommandType>,
}

impl Default for BuiltinDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl BuiltinDispatcher {
    pub fn new() -> Self {
        let mut commands = BTreeMap::new();
        commands.insert("cd", CommandType::Cd(CdCommand::new()));
        commands.insert("exit", CommandType::Exit(ExitCommand::new()));
        commands.insert("status", CommandType::Status(StatusCommand::new()));
        Self { commands }
    }

    pub fn is_builtin(&self, command: &str) -> bool {
        self.commands.contains_key(command)
    }

    /// Run `command` if it is a built-in. A failed built-in leaves
    /// `exit value 1` as the last status.
    pub fn execute(
        &self,
        command: &str,
        args: &[String],
        state: &mut ShellState,
        out: &mut dyn Write,
    ) -> Option<Result<Flow, CommandError>> {
        let cmd = self.commands.get(command)?;
        let result = cmd.execute(args, state, out);
        if result.is_err() {
            state.set_last_status(LastStatus::FAILURE);
        }
        Some(result)
    }
}
