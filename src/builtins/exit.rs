use crate::builtins::{self, prelude::*};

pub struct Exit;

impl builtins::BuiltinCommand for Exit {
    const NAME: &'static str = builtins::EXIT_NAME;

    const HELP: &'static str = "\
usage: exit

Kill every background job, then exit the shell with a status of 0.";

    fn run<T: AsRef<str>>(shell: &mut Shell, _args: &[T], _stdout: &mut dyn Write) -> Result<()> {
        shell.kill_background_jobs();
        shell.exit(Some(ExitStatus::from_success()));
    }
}
