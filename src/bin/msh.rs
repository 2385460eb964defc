#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

use docopt::Docopt;
use error_chain::bail;
use msh_rs::editor;
use msh_rs::errors::*;
use msh_rs::{MshExitStatusExt, Shell, ShellConfig};
use nix::unistd::Pid;
use std::path::PathBuf;
use std::process::ExitStatus;

const LOG_FILE_NAME: &str = ".msh_log";

const USAGE: &str = "
msh.

Usage:
    msh [options]
    msh [options] -c <command>
    msh [options] <file>
    msh (-h | --help)
    msh --version

Options:
    -h --help           Show this screen.
    --version           Show version.
    -c                  If the -c option is present, then commands are read from the first non-option
                            argument command_string.
    --log=<path>        File to write log to, defaults to ~/.msh_log
    --trace             Print the argument dump and operator notices for every line.
    --max-jobs=<n>      Maximum number of background jobs [default: 16].
";

/// Docopts input arguments.
#[derive(Debug, Deserialize)]
struct Args {
    arg_command: Option<String>,
    arg_file: Option<String>,
    flag_version: bool,
    flag_c: bool,
    flag_log: Option<String>,
    flag_trace: bool,
    flag_max_jobs: usize,
}

fn main() {
    let args: Args = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    if let Err(e) = init_logger(&args.flag_log) {
        eprintln!("msh: {}", e);
    }
    debug!("{:?}", args);

    if args.flag_version {
        println!("msh version {}", env!("CARGO_PKG_VERSION"));
    } else if args.flag_c || args.arg_file.is_some() {
        execute_from_command_string_or_file(&args);
    } else {
        execute_from_stdin(&args);
    }
}

fn init_logger(path: &Option<String>) -> Result<()> {
    let log_path = match path.clone().map(PathBuf::from).or_else(default_log_path) {
        Some(log_path) => log_path,
        None => bail!("unable to get home directory, logging is disabled"),
    };

    let pid = Pid::this();
    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}: {}",
                pid,
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Trace)
        .chain(fern::log_file(&log_path).chain_err(|| {
            format!("{}: cannot open log file", log_path.display())
        })?)
        .apply()
        .chain_err(|| "failed to install logger")?;

    Ok(())
}

fn default_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(LOG_FILE_NAME))
}

fn shell_config(args: &Args, interactive: bool) -> ShellConfig {
    let config = if interactive {
        ShellConfig::interactive()
    } else {
        ShellConfig::noninteractive()
    };

    config
        .with_job_capacity(args.flag_max_jobs)
        .with_trace(args.flag_trace)
}

fn execute_from_command_string_or_file(args: &Args) -> ! {
    let mut shell = Shell::new(shell_config(args, false));

    let result = if let Some(ref command) = args.arg_command {
        shell.execute_command_string(command)
    } else if let Some(ref file_path) = args.arg_file {
        shell.execute_commands_from_file(file_path)
    } else {
        unreachable!();
    };

    exit(result, &mut shell);
}

fn execute_from_stdin(args: &Args) -> ! {
    let mut shell = Shell::new(shell_config(args, editor::stdin_is_interactive()));
    let result = shell.execute_from_stdin();
    exit(result, &mut shell);
}

fn exit(result: Result<()>, shell: &mut Shell) -> ! {
    if let Err(e) = result {
        error!("{}", e);
        eprintln!("msh: {}", e);
        shell.exit(Some(ExitStatus::from_failure()));
    } else {
        shell.exit(None);
    }
}
