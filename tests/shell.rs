use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;

struct Session {
    dir: tempfile::TempDir,
}

impl Session {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn canonical(&self) -> PathBuf {
        self.dir.path().canonicalize().unwrap()
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_smallsh"));
        cmd.args(args)
            .current_dir(self.path())
            .env("HOME", self.path())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    fn run_with(&self, mut cmd: Command, input: &str) -> Output {
        let mut child = cmd.spawn().unwrap();
        let mut stdin = child.stdin.take().unwrap();
        // The shell may already be gone, e.g. after a fatal startup error.
        let _ = stdin.write_all(input.as_bytes());
        drop(stdin);
        child.wait_with_output().unwrap()
    }

    fn run(&self, input: &str) -> Output {
        self.run_with(self.command(&[]), input)
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

fn background_pid(out: &str) -> String {
    let start = out.find("background pid is ").unwrap() + "background pid is ".len();
    out[start..].lines().next().unwrap().to_string()
}

#[test]
fn status_before_anything_is_none() {
    let output = Session::new().run("status\nstatus\n");

    assert!(output.status.success());
    assert_eq!(stdout(&output), ": none\n: exit value 0\n: ");
}

#[test]
fn blank_and_comment_lines_are_ignored() {
    let output = Session::new().run("# status\n\n   \t\nstatus\n");
    assert_eq!(stdout(&output), ": : : : none\n: ");
}

#[test]
fn exit_ends_the_shell_with_success() {
    let output = Session::new().run("exit\nstatus\n");

    assert!(output.status.success());
    assert_eq!(stdout(&output), ": ");
}

#[test]
fn foreground_exit_code_is_reported() {
    let session = Session::new();
    session.write("three.sh", "exit 3\n");

    let output = session.run("sh three.sh\nstatus\ntrue\nstatus\n");
    assert_eq!(stdout(&output), ": : exit value 3\n: : exit value 0\n: ");
}

#[test]
fn cd_without_argument_goes_home() {
    let session = Session::new();
    fs::create_dir(session.path().join("sub")).unwrap();

    let output = session.run("cd sub\npwd\ncd\npwd\n");
    let sub = session.canonical().join("sub");
    assert_eq!(
        stdout(&output),
        format!(": : {}\n: : {}\n: ", sub.display(), session.canonical().display())
    );
}

#[test]
fn failed_cd_keeps_the_working_directory() {
    let session = Session::new();

    let output = session.run("cd /nonexistent-path-xyz\nstatus\npwd\n");
    assert_eq!(stderr(&output), "");
    assert_eq!(
        stdout(&output),
        format!(
            ": /nonexistent-path-xyz: no such file or directory\n: exit value 1\n: {}\n: ",
            session.canonical().display()
        )
    );
}

#[test]
fn redirection_copies_bytes_exactly() {
    let session = Session::new();
    session.write("A", "hello\n");

    let output = session.run("cat < A > B\nstatus\n");
    assert_eq!(fs::read(session.path().join("B")).unwrap(), b"hello\n");
    assert_eq!(stdout(&output), ": : exit value 0\n: ");
}

#[test]
fn missing_program_only_fails_the_child() {
    let output = Session::new().run("definitely-not-a-program-xyz\nstatus\n");

    assert!(output.status.success());
    assert_eq!(stderr(&output), "");
    assert_eq!(
        stdout(&output),
        ": definitely-not-a-program-xyz: no such file or directory\n: exit value 1\n: "
    );
}

#[test]
fn unwritable_output_only_fails_the_child() {
    let output = Session::new().run("echo hi > /nonexistent-dir-xyz/out\nstatus\n");

    assert_eq!(
        stderr(&output),
        "cannot open /nonexistent-dir-xyz/out for output\n"
    );
    assert_eq!(stdout(&output), ": : exit value 1\n: ");
}

#[test]
fn missing_redirect_target_is_a_syntax_error() {
    let output = Session::new().run("cat <\nstatus\n");

    assert!(stderr(&output).contains("expected a path after `<`"));
    assert_eq!(stdout(&output), ": : none\n: ");
}

#[test]
fn background_command_returns_immediately() {
    let session = Session::new();
    let mut cmd = session.command(&[]);
    // The sleeping child inherits stderr; keep it off our pipe.
    cmd.stderr(Stdio::null());

    let started = Instant::now();
    let output = session.run_with(cmd, "sleep 5 > /dev/null &\nexit\n");

    assert!(started.elapsed() < Duration::from_secs(3));
    assert!(stdout(&output).starts_with(": background pid is "));
}

#[test]
fn finished_background_job_is_reported_later() {
    let output = Session::new().run("sleep 0.1 &\nsleep 0.5\nexit\n");
    let out = stdout(&output);
    let pid = background_pid(&out);

    let launched = out.find("background pid is").unwrap();
    let done = out
        .find(&format!("background pid {pid} is done: exit value 0.\n"))
        .unwrap();
    assert!(launched < done);
}

#[test]
fn job_finished_while_waiting_for_input_is_reported_first() {
    let session = Session::new();
    let mut child = session.command(&[]).spawn().unwrap();
    let mut stdin = child.stdin.take().unwrap();

    stdin.write_all(b"sleep 0.1 &\n").unwrap();
    thread::sleep(Duration::from_millis(400));
    stdin.write_all(b"status\n").unwrap();
    drop(stdin);

    let output = child.wait_with_output().unwrap();
    let out = stdout(&output);
    let pid = background_pid(&out);

    let done = out
        .find(&format!("background pid {pid} is done: exit value 0.\n"))
        .unwrap();
    let status = out.find("none\n").unwrap();
    assert!(done < status);
}

fn ignored_signals(path: &Path) -> u64 {
    let text = fs::read_to_string(path).unwrap();
    let mask = text.trim().strip_prefix("SigIgn:").unwrap().trim();
    u64::from_str_radix(mask, 16).unwrap()
}

#[test]
fn children_get_default_sigpipe_and_the_right_sigint() {
    const SIGINT_BIT: u64 = 1 << (2 - 1);
    const SIGPIPE_BIT: u64 = 1 << (13 - 1);

    let session = Session::new();
    let output = session.run(concat!(
        "grep SigIgn /proc/self/status > fg.txt\n",
        "grep SigIgn /proc/self/status > bg.txt &\n",
        "sleep 0.3\n",
        "exit\n",
    ));
    assert!(output.status.success());

    let foreground = ignored_signals(&session.path().join("fg.txt"));
    let background = ignored_signals(&session.path().join("bg.txt"));
    assert_eq!(foreground & SIGPIPE_BIT, 0);
    assert_eq!(background & SIGPIPE_BIT, 0);
    assert_eq!(foreground & SIGINT_BIT, 0);
    assert_eq!(background & SIGINT_BIT, SIGINT_BIT);
}

#[test]
fn interrupt_kills_only_the_foreground_child() {
    let session = Session::new();
    session.write("interrupted.sh", "(sleep 0.2; kill -INT $$) &\nexec sleep 5\n");

    let started = Instant::now();
    let output = session.run("sh interrupted.sh\nstatus\nstatus\n");

    assert!(started.elapsed() < Duration::from_secs(4));
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        ": terminated by signal 2\n: terminated by signal 2\n: exit value 0\n: "
    );
}

#[test]
fn background_children_ignore_interrupts() {
    let session = Session::new();
    session.write("survivor.sh", "(sleep 0.2; kill -INT $$) &\nexec sleep 1\n");

    let output = session.run("sh survivor.sh &\nsleep 1.5\nexit\n");
    let out = stdout(&output);
    let pid = background_pid(&out);

    assert!(out.contains(&format!("background pid {pid} is done: exit value 0.\n")));
}

#[test]
fn startup_file_runs_before_the_first_prompt() {
    let session = Session::new();
    fs::create_dir(session.path().join("work")).unwrap();
    let rc = session.write("rc", "# startup\ncd work\n");

    let cmd = session.command(&["--config", rc.to_str().unwrap()]);
    let output = session.run_with(cmd, "pwd\n");

    let work = session.canonical().join("work");
    assert_eq!(stdout(&output), format!(": {}\n: ", work.display()));
}

#[test]
fn home_startup_file_is_not_sourced_without_config_flag() {
    let session = Session::new();
    session.write(".smallshrc", "sh missing-script-xyz.sh\n");

    let output = session.run("status\n");
    assert_eq!(stdout(&output), ": none\n: ");
}

#[test]
fn missing_explicit_startup_file_is_fatal() {
    let session = Session::new();
    let cmd = session.command(&["-c", "/nonexistent-rc-xyz"]);

    let output = session.run_with(cmd, "status\n");
    assert!(!output.status.success());
    assert!(stderr(&output).contains("/nonexistent-rc-xyz"));
}

#[test]
fn unknown_flag_is_rejected() {
    let session = Session::new();
    let output = session.run_with(session.command(&["--bogus"]), "");

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Unknown argument --bogus"));
}
