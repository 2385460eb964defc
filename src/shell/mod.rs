pub use self::job_control::{JobManager, DEFAULT_JOB_CAPACITY};
pub use self::shell::Shell;

pub mod job_control;
mod shell;

/// Policy object to control a Shell's behavior
#[derive(Debug, Copy, Clone)]
pub struct ShellConfig {
    /// Maximum number of background jobs tracked at once.
    job_capacity: usize,

    /// Determines if some messages (e.g. "exit") should be displayed.
    display_messages: bool,

    /// Prints the argument dump and the pipe/redirect/background notices
    /// for every line.
    trace: bool,
}

impl ShellConfig {
    /// Creates an interactive shell
    ///
    /// # Complete List
    /// - Default job capacity
    /// - Some additional messages are displayed
    /// - No trace output
    pub fn interactive() -> Self {
        Self {
            display_messages: true,
            ..Default::default()
        }
    }

    /// Creates a noninteractive shell, e.g. for `-c` or a script file
    ///
    /// # Complete List
    /// - Default job capacity
    /// - Fewer messages are displayed
    /// - No trace output
    pub fn noninteractive() -> Self {
        Default::default()
    }

    /// Sets the maximum number of background jobs.
    pub fn with_job_capacity(mut self, job_capacity: usize) -> Self {
        self.job_capacity = job_capacity;
        self
    }

    /// Enables or disables the per-line diagnostic trace.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn job_capacity(&self) -> usize {
        self.job_capacity
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            job_capacity: DEFAULT_JOB_CAPACITY,
            display_messages: false,
            trace: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builders() {
        let config = ShellConfig::interactive().with_job_capacity(2).with_trace(true);
        assert_eq!(config.job_capacity(), 2);
        assert!(config.display_messages);
        assert!(config.trace);

        let config = ShellConfig::noninteractive();
        assert_eq!(config.job_capacity(), DEFAULT_JOB_CAPACITY);
        assert!(!config.display_messages);
        assert!(!config.trace);
    }
}
