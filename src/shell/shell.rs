//! Msh - Shell Module
//!
//! The Shell owns the job table and runs the read-eval loop: each line is
//! tokenized, classified, then handed to a builtin or spawned as processes.

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::Path;
use std::process::{self, ExitStatus};

use crate::builtins;
use crate::core::{
    intermediate_representation as ir,
    job::{Job, ProcessId},
    parser::Command,
};
use crate::editor::{self, LineReader, LineSource};
use crate::errors::{ErrorKind, Result, ResultExt};
use crate::execute_command::spawn_processes;
use crate::shell::{job_control::JobManager, ShellConfig};
use crate::util::{self, MshExitStatusExt};

const PROMPT: &str = "msh> ";
const SYNTAX_ERROR_EXIT_STATUS: i32 = 2;
const COMMAND_NOT_FOUND_EXIT_STATUS: i32 = 127;

/// Msh Shell
pub struct Shell {
    job_manager: JobManager,
    /// Exit status of last command executed.
    last_exit_status: ExitStatus,
    config: ShellConfig,
}

impl Shell {
    /// Constructs a new Shell with an empty job table sized by `config`.
    pub fn new(config: ShellConfig) -> Shell {
        info!("msh started up");
        Shell {
            job_manager: JobManager::with_capacity(config.job_capacity),
            last_exit_status: ExitStatus::from_success(),
            config,
        }
    }

    pub fn last_exit_status(&self) -> ExitStatus {
        self.last_exit_status
    }

    /// Runs one command line.
    ///
    /// Syntax errors and unknown programs are reported here and only change
    /// the last exit status; other failures are returned.
    pub fn execute_command_string(&mut self, input: &str) -> Result<()> {
        let command = match Command::parse(input) {
            Some(command) => command,
            None => return Ok(()),
        };

        if self.config.trace {
            trace_arguments(&command);
        }

        let command_group = match ir::Interpreter::parse(command) {
            Ok(command_group) => command_group,
            Err(e) => {
                if let ErrorKind::Syntax(_) = *e.kind() {
                    eprintln!("msh: {}", e);
                    self.last_exit_status = ExitStatus::from_status(SYNTAX_ERROR_EXIT_STATUS);
                    return Ok(());
                }

                return Err(e);
            }
        };

        self.execute_command(&command_group)
    }

    /// Runs each line of a file as if it had been typed.
    pub fn execute_commands_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::open(path).chain_err(|| format!("{}: cannot open", path.display()))?;
        self.execute_from_source(&mut LineReader::new(BufReader::new(file)))
    }

    /// Runs lines from stdin until EOF is received.
    pub fn execute_from_stdin(&mut self) -> Result<()> {
        let mut source = editor::stdin_source()?;
        self.execute_from_source(&mut *source)
    }

    /// Read-eval loop. Finished background jobs are reaped before each
    /// prompt. Returns once `source` is exhausted; jobs are left running.
    pub fn execute_from_source(&mut self, source: &mut dyn LineSource) -> Result<()> {
        loop {
            self.reap_background_jobs();

            let line = match source.read_line(PROMPT)? {
                Some(line) => line,
                None => break,
            };

            if let Err(e) = self.execute_command_string(&line) {
                error!("execute_command_string: {}", e);
                eprintln!("msh: {}", e);
                self.last_exit_status = ExitStatus::from_failure();
            }
        }

        info!("end of input");
        Ok(())
    }

    fn execute_command(&mut self, command_group: &ir::CommandGroup) -> Result<()> {
        if let ir::Command::Builtin {
            ref program,
            ref args,
        } = command_group.command
        {
            let mut stdout = io::stdout();
            let (status, result) = builtins::run(self, program, &args[..], &mut stdout);
            self.last_exit_status = status;
            if let Err(e) = result {
                debug!("{} failed: {}", program, e);
                eprintln!("msh: {}", e);
            }
            stdout.flush()?;
            return Ok(());
        }

        if command_group.background {
            self.job_manager.ensure_capacity()?;
        }
        if self.config.trace {
            trace_command_group(command_group);
        }

        let process_group = match spawn_processes(command_group) {
            Ok(process_group) => process_group,
            Err(e) => {
                if let ErrorKind::CommandNotFound(_) = *e.kind() {
                    eprintln!("{}", e);
                    self.last_exit_status = ExitStatus::from_status(COMMAND_NOT_FOUND_EXIT_STATUS);
                    return Ok(());
                }

                return Err(e);
            }
        };

        if process_group.foreground {
            let ids = process_group.ids();
            let status = process_group.wait()?;
            debug!("{:?} ({}) completed: {}", ids, command_group.input, status);
            if self.config.trace {
                println!("Child completed..");
            }
            self.last_exit_status = status;
        } else {
            for process in process_group.processes {
                let pid = self.job_manager.create_job(&command_group.input, process)?;
                println!("[{}] {}", pid, command_group.input);
            }
            self.last_exit_status = ExitStatus::from_success();
        }

        Ok(())
    }

    /// Returns `true` if the shell has background jobs.
    pub fn has_background_jobs(&self) -> bool {
        self.job_manager.has_jobs()
    }

    /// Returns the shell's jobs, oldest first.
    pub fn get_jobs(&self) -> &[Job] {
        self.job_manager.get_jobs()
    }

    /// Waits for the specified job, or the most recent one, and removes it.
    pub fn put_job_in_foreground(&mut self, pid: Option<ProcessId>) -> Result<Job> {
        self.job_manager.put_job_in_foreground(pid)
    }

    /// Marks background jobs that have terminated as done, without blocking.
    pub fn reap_background_jobs(&mut self) {
        let temp_result = self.job_manager.update_job_statuses();
        log_if_err!(temp_result, "failed to update job statuses");
    }

    /// Kills and reaps every background job.
    pub fn kill_background_jobs(&mut self) {
        self.job_manager.kill_all();
    }

    /// Exits the process with status `n`, or with the last command's status
    /// when `n` is None. The code is folded into 0..=255 the way bash does.
    pub fn exit(&mut self, n: Option<ExitStatus>) -> ! {
        if self.config.display_messages {
            println!("exit");
        }

        let status = n.unwrap_or(self.last_exit_status);
        let code = status.code().unwrap_or(1);

        info!("msh has shut down");
        process::exit(util::code_like_u8(code));
    }
}

impl fmt::Debug for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}\nlast status: {}", self.job_manager, self.last_exit_status)
    }
}

fn trace_arguments(command: &Command) {
    println!("The command entered has {} arguments", command.argv.len());
    for (i, arg) in command.argv.iter().enumerate() {
        println!("  args[{}] = {}", i, arg);
    }
    if command.background {
        println!("Background enabled..");
    } else {
        println!("Background not enabled..");
    }
}

fn trace_command_group(command_group: &ir::CommandGroup) {
    match command_group.command {
        ir::Command::Pipeline { .. } => println!("Pipe detected.."),
        ir::Command::Simple(ref simple) if simple.stdout != ir::Stdio::Inherit => {
            println!("Redirect detected..")
        }
        _ => {}
    }
}
