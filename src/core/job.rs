use std::fmt;
use std::process::{Child, ChildStdout, ExitStatus};

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;

use crate::errors::{Result, ResultExt};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProcessId(u32);

impl ProcessId {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl From<u32> for ProcessId {
    fn from(value: u32) -> Self {
        ProcessId(value)
    }
}

impl From<ProcessId> for Pid {
    fn from(value: ProcessId) -> Self {
        Pid::from_raw(value.0 as i32)
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque handle to a spawned child process.
///
/// The pid is known as soon as the handle exists; the only other observable
/// state is termination, through `wait` or `try_wait`.
pub struct ProcessHandle {
    child: Child,
}

impl ProcessHandle {
    pub fn new(child: Child) -> Self {
        Self { child }
    }

    pub fn id(&self) -> ProcessId {
        self.child.id().into()
    }

    /// Takes the read end of the pipe connected to the child's stdout, if any.
    pub fn take_stdout(&mut self) -> Option<ChildStdout> {
        self.child.stdout.take()
    }

    /// Blocks until the child terminates.
    pub fn wait(&mut self) -> Result<ExitStatus> {
        let id = self.id();
        self.child
            .wait()
            .chain_err(|| format!("failed to wait for process {}", id))
    }

    /// Reaps the child if it has terminated, without blocking.
    pub fn try_wait(&mut self) -> Result<Option<ExitStatus>> {
        let id = self.id();
        self.child
            .try_wait()
            .chain_err(|| format!("failed to poll process {}", id))
    }

    /// Sends SIGKILL. Must only be called while the child has not been reaped,
    /// otherwise the pid may already belong to an unrelated process.
    pub fn kill(&mut self) -> Result<()> {
        signal::kill(self.id().into(), Signal::SIGKILL)?;
        Ok(())
    }
}

impl fmt::Debug for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProcessHandle {{ id: {} }}", self.id())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum JobStatus {
    Running,
    Done,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            JobStatus::Running => write!(f, "Running"),
            JobStatus::Done => write!(f, "Done"),
        }
    }
}

/// A background process and the command line that started it.
pub struct Job {
    input: String,
    process: ProcessHandle,
    status_code: Option<ExitStatus>,
}

impl Job {
    pub fn new(input: &str, process: ProcessHandle) -> Self {
        Self {
            input: input.to_string(),
            process,
            status_code: None,
        }
    }

    pub fn pid(&self) -> ProcessId {
        self.process.id()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn status(&self) -> JobStatus {
        if self.status_code.is_some() {
            JobStatus::Done
        } else {
            JobStatus::Running
        }
    }

    pub fn status_code(&self) -> Option<ExitStatus> {
        self.status_code
    }

    pub fn is_completed(&self) -> bool {
        self.status() == JobStatus::Done
    }

    /// Blocks until the job's process terminates.
    pub fn wait(&mut self) -> Result<ExitStatus> {
        if let Some(status_code) = self.status_code {
            return Ok(status_code);
        }

        let status_code = self.process.wait()?;
        self.status_code = Some(status_code);
        Ok(status_code)
    }

    pub fn try_wait(&mut self) -> Result<Option<ExitStatus>> {
        if self.status_code.is_none() {
            self.status_code = self.process.try_wait()?;
        }

        Ok(self.status_code)
    }

    /// Force-terminates the process if it is still running and reaps it.
    pub fn kill(&mut self) -> Result<ExitStatus> {
        if self.try_wait()?.is_none() {
            debug!("killing job {}: {}", self.pid(), self.input);
            self.process.kill()?;
        }

        self.wait()
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.pid(), self.status(), self.input)
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pid: {}\tinput: {}", self.pid(), self.input)
    }
}
