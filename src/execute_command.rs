use std::ffi::OsStr;
use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::process::{ChildStdout, Command, ExitStatus, Stdio};

use crate::core::intermediate_representation as ir;
use crate::core::job::{ProcessHandle, ProcessId};
use crate::errors::{Error, Result, ResultExt};
use crate::util::MshExitStatusExt;

/// Permission bits for files created by `>`, before the umask is applied.
const REDIRECT_FILE_MODE: u32 = 0o666;

#[derive(Debug)]
enum Stdin {
    Inherit,
    Child(ChildStdout),
}

#[derive(Debug)]
enum Output {
    Inherit,
    File(File),
    CreatePipe,
}

impl Output {
    fn new(redirect: &ir::Stdio) -> Result<Self> {
        match redirect {
            ir::Stdio::Inherit => Ok(Output::Inherit),
            ir::Stdio::Filename(filename) => {
                let file = OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .mode(REDIRECT_FILE_MODE)
                    .open(filename)
                    .chain_err(|| format!("{}: cannot redirect output", filename))?;
                Ok(Output::File(file))
            }
        }
    }
}

impl From<Stdin> for Stdio {
    fn from(stdin: Stdin) -> Self {
        match stdin {
            Stdin::Inherit => Self::inherit(),
            Stdin::Child(child) => child.into(),
        }
    }
}

impl From<Output> for Stdio {
    fn from(stdout: Output) -> Self {
        match stdout {
            Output::Inherit => Self::inherit(),
            Output::File(file) => file.into(),
            Output::CreatePipe => Self::piped(),
        }
    }
}

/// The processes spawned for one command line.
#[derive(Debug)]
pub struct ProcessGroup {
    pub processes: Vec<ProcessHandle>,
    pub foreground: bool,
}

impl ProcessGroup {
    pub fn ids(&self) -> Vec<ProcessId> {
        self.processes.iter().map(ProcessHandle::id).collect()
    }

    /// Blocks until every process has terminated and returns the exit status
    /// of the last one, i.e. the second stage of a pipeline.
    ///
    /// A failed wait does not stop the remaining processes from being waited
    /// for; the first error is returned afterwards.
    pub fn wait(self) -> Result<ExitStatus> {
        let mut last_status = ExitStatus::from_success();
        let mut first_error = None;
        for mut process in self.processes {
            match process.wait() {
                Ok(status) => {
                    debug!("process {} exited with {}", process.id(), status);
                    last_status = status;
                }
                Err(e) => {
                    warn!("{}", e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(last_status),
        }
    }
}

/// Spawns the external processes of `command_group` without waiting for them.
///
/// Builtins never reach this point; the shell runs them in-process.
pub fn spawn_processes(command_group: &ir::CommandGroup) -> Result<ProcessGroup> {
    let processes = match command_group.command {
        ir::Command::Simple(ref simple_command) => vec![run_simple_command(simple_command)?],
        ir::Command::Pipeline {
            ref first,
            ref second,
        } => run_pipeline(first, second)?,
        ir::Command::Builtin { ref program, .. } => {
            bail!("{}: builtins do not run as separate processes", program)
        }
    };

    Ok(ProcessGroup {
        processes,
        foreground: !command_group.background,
    })
}

fn run_simple_command(command: &ir::SimpleCommand) -> Result<ProcessHandle> {
    let stdout = Output::new(&command.stdout)?;
    run_external_command(&command.program, &command.args, Stdin::Inherit, stdout)
}

/// Connects `first`'s stdout to `second`'s stdin. Both stages are spawned
/// before anyone waits on either.
fn run_pipeline(
    first: &ir::SimpleCommand,
    second: &ir::SimpleCommand,
) -> Result<Vec<ProcessHandle>> {
    let mut first_process =
        run_external_command(&first.program, &first.args, Stdin::Inherit, Output::CreatePipe)?;
    let pipe = first_process
        .take_stdout()
        .ok_or_else(|| Error::from("pipe to the second command was not created"))
        .and_then(|read_end| {
            Output::new(&second.stdout).map(|stdout| (Stdin::Child(read_end), stdout))
        });

    let second_process = pipe.and_then(|(stdin, stdout)| {
        run_external_command(&second.program, &second.args, stdin, stdout)
    });

    match second_process {
        Ok(second_process) => Ok(vec![first_process, second_process]),
        Err(e) => {
            // The first stage is already running and must not be left unreaped.
            let temp_result = first_process.wait();
            log_if_err!(temp_result, "failed to wait for {}", first.program);
            Err(e)
        }
    }
}

/// Spawns `program`, resolved through `PATH`, with the shell's environment.
///
/// The `Command` owns the parent's copies of any pipe or file handed to the
/// child and closes them when it is dropped at the end of this function, so
/// the reader of a pipe sees EOF once the writer exits.
fn run_external_command<S1, S2>(
    program: S1,
    args: &[S2],
    stdin: Stdin,
    stdout: Output,
) -> Result<ProcessHandle>
where
    S1: AsRef<str>,
    S2: AsRef<str>,
{
    let mut command = Command::new(OsStr::new(program.as_ref()));
    command.args(args.iter().map(AsRef::as_ref).map(OsStr::new));
    command.stdin(stdin);
    command.stdout(stdout);

    let child = command.spawn().map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            Error::command_not_found(&program)
        } else {
            Error::with_chain(e, format!("{}: failed to start", program.as_ref()))
        }
    })?;

    debug!("spawned {} as process {}", program.as_ref(), child.id());
    Ok(ProcessHandle::new(child))
}
