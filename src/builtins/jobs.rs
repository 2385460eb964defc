use crate::builtins::{self, prelude::*};
use crate::core::job::ProcessId;

pub struct Jobs;

impl builtins::BuiltinCommand for Jobs {
    const NAME: &'static str = builtins::JOBS_NAME;

    const HELP: &'static str = "\
usage: jobs

List background jobs in the order they were started, one per line:
process id, status and command.";

    fn run<T: AsRef<str>>(shell: &mut Shell, args: &[T], stdout: &mut dyn Write) -> Result<()> {
        if !args.is_empty() {
            return Err(Error::builtin_command(
                format!("{}: {}", Self::NAME, Self::usage()),
                2,
            ));
        }

        shell.reap_background_jobs();
        let jobs = shell.get_jobs();
        if jobs.is_empty() {
            writeln!(stdout, "No background jobs")?;
        }
        for job in jobs {
            writeln!(stdout, "{}", job)?;
        }

        Ok(())
    }
}

pub struct Fg;

#[derive(Debug, Deserialize)]
struct FgArgs {
    arg_pid: Option<u32>,
}

impl builtins::BuiltinCommand for Fg {
    const NAME: &'static str = builtins::FG_NAME;

    const HELP: &'static str = "\
usage: fg [<pid>]

Wait for the background job with process id PID to finish, or for the
most recently started job if PID is not given, then remove it from the
job list.";

    fn run<T: AsRef<str>>(shell: &mut Shell, args: &[T], stdout: &mut dyn Write) -> Result<()> {
        let args: FgArgs = parse_args(Self::HELP, Self::NAME, args.iter().map(AsRef::as_ref))?;
        debug!("{:?}", args);

        if !shell.has_background_jobs() {
            return Err(Error::builtin_command("fg: no current job", 1));
        }

        let job = shell
            .put_job_in_foreground(args.arg_pid.map(ProcessId::from))
            .map_err(|e| {
                if matches!(*e.kind(), ErrorKind::NoSuchJob(_)) {
                    Error::builtin_command(format!("fg: {}", e), 1)
                } else {
                    e
                }
            })?;
        writeln!(stdout, "[{}] removed: {}", job.pid(), job.input())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::ShellConfig;
    use std::io;

    const NO_ARGS: &[&str] = &[];

    fn new_shell() -> Shell {
        Shell::new(ShellConfig::noninteractive())
    }

    fn message(result: Result<()>) -> String {
        match result {
            Err(e) => e.to_string(),
            Ok(()) => panic!("expected an error"),
        }
    }

    #[test]
    fn jobs_without_jobs() {
        let mut shell = new_shell();
        let mut stdout = Vec::new();
        Jobs::run(&mut shell, NO_ARGS, &mut stdout).unwrap();
        assert_eq!(String::from_utf8(stdout).unwrap(), "No background jobs\n");
    }

    #[test]
    fn jobs_rejects_arguments() {
        let mut shell = new_shell();
        let result = Jobs::run(&mut shell, &["-l"], &mut io::sink());
        assert_eq!(message(result), "jobs: usage: jobs");
    }

    #[test]
    fn jobs_lists_in_registration_order() {
        let mut shell = new_shell();
        shell.execute_command_string("sleep 30 &").unwrap();
        shell.execute_command_string("sleep 31 &").unwrap();
        let pids: Vec<_> = shell.get_jobs().iter().map(|job| job.pid()).collect();

        let mut stdout = Vec::new();
        Jobs::run(&mut shell, NO_ARGS, &mut stdout).unwrap();
        assert_eq!(
            String::from_utf8(stdout).unwrap(),
            format!(
                "{}\tRunning\tsleep 30\n{}\tRunning\tsleep 31\n",
                pids[0], pids[1]
            )
        );
        shell.kill_background_jobs();
    }

    #[test]
    fn fg_without_jobs() {
        let mut shell = new_shell();
        let result = Fg::run(&mut shell, NO_ARGS, &mut io::sink());
        assert_eq!(message(result), "fg: no current job");
    }

    #[test]
    fn fg_rejects_non_numeric_pid() {
        let mut shell = new_shell();
        let result = Fg::run(&mut shell, &["abc"], &mut io::sink());
        assert_eq!(message(result), "fg: usage: fg [<pid>]");
    }

    #[test]
    fn fg_recalls_most_recent_job() {
        let mut shell = new_shell();
        shell.execute_command_string("sleep 30 &").unwrap();
        shell.execute_command_string("sleep 0 &").unwrap();
        let first = shell.get_jobs()[0].pid();
        let second = shell.get_jobs()[1].pid();

        let mut stdout = Vec::new();
        Fg::run(&mut shell, NO_ARGS, &mut stdout).unwrap();
        assert_eq!(
            String::from_utf8(stdout).unwrap(),
            format!("[{}] removed: sleep 0\n", second)
        );
        let remaining: Vec<_> = shell.get_jobs().iter().map(|job| job.pid()).collect();
        assert_eq!(remaining, vec![first]);
        shell.kill_background_jobs();
    }

    #[test]
    fn fg_with_unknown_pid() {
        let mut shell = new_shell();
        shell.execute_command_string("sleep 30 &").unwrap();
        let pid = shell.get_jobs()[0].pid();
        let unknown = pid.as_u32().wrapping_add(100_000).to_string();

        let result = Fg::run(&mut shell, &[unknown.as_str()], &mut io::sink());
        assert_eq!(message(result), format!("fg: {}: no such job", unknown));
        assert_eq!(shell.get_jobs().len(), 1);
        shell.kill_background_jobs();
    }

    #[test]
    fn fg_with_pid() {
        let mut shell = new_shell();
        shell.execute_command_string("sleep 0 &").unwrap();
        shell.execute_command_string("sleep 30 &").unwrap();
        let first = shell.get_jobs()[0].pid();
        let pid = first.to_string();

        let mut stdout = Vec::new();
        Fg::run(&mut shell, &[pid.as_str()], &mut stdout).unwrap();
        assert_eq!(
            String::from_utf8(stdout).unwrap(),
            format!("[{}] removed: sleep 0\n", first)
        );
        assert_eq!(shell.get_jobs().len(), 1);
        shell.kill_background_jobs();
    }
}
