use std::ffi::{CStr, CString};
use std::io::{self, Write};
use std::ptr;

use libc::{c_char, c_int, c_uint, O_CREAT, O_RDONLY, O_TRUNC, O_WRONLY, STDERR_FILENO, STDIN_FILENO, STDOUT_FILENO};

use super::signal::restore_runtime_defaults;
use super::{cerr, Disposition, Mode, ProcessError, ProcessId};
use crate::core::parser::Command;

const DEV_NULL: &CStr = c"/dev/null";
const OUTPUT_MODE: c_uint = 0o644;

enum ForkResult {
    Parent(ProcessId),
    Child,
}

fn fork() -> io::Result<ForkResult> {
    // SAFETY: the child only runs `ExecPlan::exec`, which restricts itself to
    // async-signal-safe calls on memory prepared before the fork.
    let pid = cerr(unsafe { libc::fork() })?;
    if pid == 0 {
        Ok(ForkResult::Child)
    } else {
        Ok(ForkResult::Parent(ProcessId(pid)))
    }
}

fn _exit(status: c_int) -> ! {
    // SAFETY: `_exit` skips atexit handlers and stdio flushing, which is what
    // a forked child that failed to exec needs.
    unsafe { libc::_exit(status) }
}

fn write_fd(fd: c_int, message: &[u8]) {
    // SAFETY: `message` is valid for `message.len()` bytes. Best effort:
    // nobody is left to report a failed diagnostic to.
    unsafe { libc::write(fd, message.as_ptr().cast(), message.len()) };
}

/// Open `path` and move the descriptor onto `target`.
fn redirect(path: &CStr, flags: c_int, target: c_int) -> io::Result<()> {
    // SAFETY: `path` is a nul-terminated C string; the mode is only read with O_CREAT.
    let fd = cerr(unsafe { libc::open(path.as_ptr(), flags, OUTPUT_MODE) })?;
    if fd != target {
        // SAFETY: both descriptors are plain integers; `fd` was just opened
        // by this process and is closed exactly once.
        let duped = cerr(unsafe { libc::dup2(fd, target) });
        unsafe { libc::close(fd) };
        duped?;
    }
    Ok(())
}

struct Redirect {
    path: CString,
    failure: Vec<u8>,
}

impl Redirect {
    fn new(path: &str, direction: &str) -> Result<Self, ProcessError> {
        Ok(Self {
            path: CString::new(path).map_err(|_| ProcessError::InvalidArgument(path.to_string()))?,
            failure: format!("cannot open {} for {}\n", path, direction).into_bytes(),
        })
    }
}

/// Everything the child needs, built before `fork` so the child never allocates.
struct ExecPlan {
    argv: Vec<CString>,
    input: Option<Redirect>,
    output: Option<Redirect>,
    mode: Mode,
    not_found: Vec<u8>,
}

impl ExecPlan {
    fn new(command: &Command) -> Result<Self, ProcessError> {
        let argv = command
            .args
            .iter()
            .map(|arg| CString::new(arg.as_str()).map_err(|_| ProcessError::InvalidArgument(arg.clone())))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            argv,
            input: command.input.as_deref().map(|p| Redirect::new(p, "input")).transpose()?,
            output: command.output.as_deref().map(|p| Redirect::new(p, "output")).transpose()?,
            mode: command.mode(),
            not_found: format!("{}: no such file or directory\n", command.program()).into_bytes(),
        })
    }

    fn exec(&self, argv: &[*const c_char]) -> ! {
        if let Some(input) = &self.input {
            if redirect(&input.path, O_RDONLY, STDIN_FILENO).is_err() {
                write_fd(STDERR_FILENO, &input.failure);
                _exit(1);
            }
        } else if self.mode == Mode::Background && redirect(DEV_NULL, O_RDONLY, STDIN_FILENO).is_err() {
            write_fd(STDERR_FILENO, b"cannot open /dev/null for input\n");
            _exit(1);
        }

        if let Some(output) = &self.output {
            if redirect(&output.path, O_WRONLY | O_CREAT | O_TRUNC, STDOUT_FILENO).is_err() {
                write_fd(STDERR_FILENO, &output.failure);
                _exit(1);
            }
        }

        if restore_runtime_defaults().is_err() {
            _exit(1);
        }
        if self.mode == Mode::Foreground && Disposition::FOREGROUND.apply().is_err() {
            _exit(1);
        }

        // SAFETY: `argv` is a null-terminated array of pointers into `self.argv`.
        unsafe { libc::execvp(argv[0], argv.as_ptr()) };

        // Lands wherever standard output now points, like any other output.
        write_fd(STDOUT_FILENO, &self.not_found);
        _exit(1)
    }
}

/// Forks one child per external command and replaces its image.
#[derive(Clone, Default)]
pub struct ProcessLauncher;

impl ProcessLauncher {
    pub fn new() -> Self {
        Self
    }

    /// Start `command` and return the child's pid without waiting for it.
    ///
    /// A failing redirection or a missing program only kills the child; the
    /// parent learns about it through the exit status. A failed `fork` is
    /// returned as [`ProcessError::Fork`].
    pub fn launch(&self, command: &Command) -> Result<ProcessId, ProcessError> {
        if command.args.is_empty() {
            return Err(ProcessError::EmptyCommand);
        }
        let plan = ExecPlan::new(command)?;
        let mut argv: Vec<*const c_char> = plan.argv.iter().map(|arg| arg.as_ptr()).collect();
        argv.push(ptr::null());

        // Anything still buffered would otherwise be written by both processes.
        io::stdout().flush()?;

        match fork().map_err(ProcessError::Fork)? {
            ForkResult::Child => plan.exec(&argv),
            ForkResult::Parent(pid) => {
                log::debug!(
                    "spawned {} as pid {} ({:?})",
                    command.program(),
                    pid,
                    command.mode()
                );
                Ok(pid)
            }
        }
    }
}
