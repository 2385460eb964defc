//! Msh builtins
//!
//! Builtins run inside the shell process and write to the stream they are
//! given, never to a child process.

use std::iter;

use docopt::Docopt;
use serde::de::DeserializeOwned;

use self::prelude::*;

use self::dirs::{Cd, Pwd};
use self::echo::Echo;
use self::exit::Exit;
use self::jobs::{Fg, Jobs};

pub mod prelude {
    pub use std::io::Write;
    pub use std::process::ExitStatus;

    pub use super::{parse_args, BuiltinCommand};
    pub use crate::errors::{Error, ErrorKind, Result};
    pub use crate::shell::Shell;
    pub use crate::util::MshExitStatusExt;
}

mod dirs;
mod echo;
mod exit;
mod jobs;

const CD_NAME: &str = "cd";
const ECHO_NAME: &str = "echo";
const EXIT_NAME: &str = "exit";
const FG_NAME: &str = "fg";
const JOBS_NAME: &str = "jobs";
const PWD_NAME: &str = "pwd";

/// Represents a Msh builtin command such as cd or fg.
pub trait BuiltinCommand {
    /// The NAME of the command.
    const NAME: &'static str;
    /// The help string; its first line is the usage line.
    const HELP: &'static str;
    /// The usage string to display to the user.
    fn usage() -> String {
        Self::HELP.lines().next().unwrap_or(Self::NAME).to_owned()
    }
    /// Runs the command with the given arguments in the `shell` environment.
    fn run<T: AsRef<str>>(shell: &mut Shell, args: &[T], stdout: &mut dyn Write) -> Result<()>;
}

/// Exact, case-sensitive match against the builtin names.
pub fn is_builtin<T: AsRef<str>>(program: T) -> bool {
    [CD_NAME, ECHO_NAME, EXIT_NAME, FG_NAME, JOBS_NAME, PWD_NAME].contains(&program.as_ref())
}

/// precondition: command is a builtin.
/// Returns (`exit_status_code`, `builtin_result`)
pub fn run<S1, S2>(
    shell: &mut Shell,
    program: S1,
    args: &[S2],
    stdout: &mut dyn Write,
) -> (ExitStatus, Result<()>)
where
    S1: AsRef<str>,
    S2: AsRef<str>,
{
    debug_assert!(is_builtin(&program));

    let result = match program.as_ref() {
        CD_NAME => Cd::run(shell, args, stdout),
        ECHO_NAME => Echo::run(shell, args, stdout),
        EXIT_NAME => Exit::run(shell, args, stdout),
        FG_NAME => Fg::run(shell, args, stdout),
        JOBS_NAME => Jobs::run(shell, args, stdout),
        PWD_NAME => Pwd::run(shell, args, stdout),
        _ => unreachable!(),
    };

    let exit_status = get_builtin_exit_status(&result);
    (exit_status, result)
}

fn get_builtin_exit_status(result: &Result<()>) -> ExitStatus {
    let status = if let Err(ref e) = *result {
        match *e.kind() {
            ErrorKind::BuiltinCommand(_, code) => code,
            _ => 1,
        }
    } else {
        0
    };

    ExitStatus::from_status(status)
}

/// Parses `args` against the docopt usage in `usage`. A mismatch becomes a
/// builtin error carrying the usage line and status 2.
pub fn parse_args<D, S, I>(usage: &str, program: S, args: I) -> Result<D>
where
    D: DeserializeOwned,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let name = program.as_ref().to_string();
    Docopt::new(usage)?
        .argv(iter::once(program).chain(args))
        .deserialize()
        .map_err(|e| {
            debug!("{}: {}", name, e);
            let usage_line = usage.lines().next().unwrap_or_default();
            Error::builtin_command(format!("{}: {}", name, usage_line), 2)
        })
}
