use std::fmt;

use crate::core::job::{Job, ProcessHandle, ProcessId};
use crate::errors::{Error, ErrorKind, Result};

pub const DEFAULT_JOB_CAPACITY: usize = 16;

/// Bounded registry of background jobs, kept in registration order so the
/// last entry is the most recent job.
pub struct JobManager {
    jobs: Vec<Job>,
    capacity: usize,
}

impl Default for JobManager {
    fn default() -> Self {
        JobManager::with_capacity(DEFAULT_JOB_CAPACITY)
    }
}

impl JobManager {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            jobs: Vec::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn has_jobs(&self) -> bool {
        !self.jobs.is_empty()
    }

    pub fn get_jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// Fails with `JobTableFull` when no further job can be registered.
    ///
    /// Checked before spawning so a rejected command never runs.
    pub fn ensure_capacity(&self) -> Result<()> {
        if self.jobs.len() >= self.capacity {
            Err(ErrorKind::JobTableFull(self.capacity).into())
        } else {
            Ok(())
        }
    }

    /// Registers a spawned process. A process that cannot be registered is
    /// killed and reaped before the error is returned.
    pub fn create_job(&mut self, input: &str, process: ProcessHandle) -> Result<ProcessId> {
        let pid = process.id();
        if let Err(e) = self.ensure_capacity() {
            discard_process(process);
            return Err(e);
        }
        if self.find_job(pid).is_some() {
            discard_process(process);
            return Err(ErrorKind::DuplicateJob(pid.as_u32()).into());
        }

        debug!("registering job {}: {}", pid, input);
        self.jobs.push(Job::new(input, process));
        Ok(pid)
    }

    /// The most recently registered job.
    pub fn current_job(&self) -> Option<ProcessId> {
        self.jobs.last().map(Job::pid)
    }

    /// Waits for the given job, or the current one, to terminate, then removes
    /// it from the table and returns it.
    pub fn put_job_in_foreground(&mut self, pid: Option<ProcessId>) -> Result<Job> {
        let pid = pid
            .or_else(|| self.current_job())
            .ok_or_else(|| Error::no_such_job("current"))?;
        debug!("putting job {} in foreground", pid);

        let job_index = self
            .find_job(pid)
            .ok_or_else(|| Error::no_such_job(pid.to_string()))?;
        self.jobs[job_index].wait()?;
        Ok(self.jobs.remove(job_index))
    }

    /// Reaps jobs that have terminated without blocking. Reaped jobs stay in
    /// the table, marked `Done`, until `fg` or `kill_all` removes them.
    pub fn update_job_statuses(&mut self) -> Result<()> {
        for job in &mut self.jobs {
            let was_running = !job.is_completed();
            if let Some(status_code) = job.try_wait()? {
                if was_running {
                    info!("job {} ({}) finished: {}", job.pid(), job.input(), status_code);
                }
            }
        }

        Ok(())
    }

    /// Force-terminates and reaps every job, emptying the table.
    pub fn kill_all(&mut self) {
        for mut job in self.jobs.drain(..) {
            let temp_result = job.kill();
            log_if_err!(temp_result, "failed to kill job {}", job.pid());
        }
    }

    fn find_job(&self, pid: ProcessId) -> Option<usize> {
        self.jobs.iter().position(|job| job.pid() == pid)
    }
}

fn discard_process(mut process: ProcessHandle) {
    let pid = process.id();
    let temp_result = process.kill();
    log_if_err!(temp_result, "failed to kill unregistered process {}", pid);
    let temp_result = process.wait();
    log_if_err!(temp_result, "failed to reap unregistered process {}", pid);
}

impl fmt::Debug for JobManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} jobs\tcapacity: {}", self.jobs.len(), self.capacity)?;
        for job in &self.jobs {
            writeln!(f, "{:?}", job)?;
        }

        Ok(())
    }
}
