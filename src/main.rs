use smallsh::flags::Flags;
use smallsh::shell::Shell;
use std::env;
use std::process::ExitCode;

fn run() -> Result<(), smallsh::error::ShellError> {
    let mut flags = Flags::new();
    let args: Vec<String> = env::args().skip(1).collect();
    flags.parse(&args)?;

    if flags.is_set("help") {
        flags.print_help();
        return Ok(());
    }

    if flags.is_set("version") {
        println!("smallsh {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    smallsh::logger::init(flags.log_level());

    let mut shell = Shell::new(&flags)?;
    shell.run()
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("smallsh: {}", e);
            ExitCode::FAILURE
        }
    }
}
