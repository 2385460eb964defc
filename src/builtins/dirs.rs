use std::env;

use crate::builtins::{self, prelude::*};

pub struct Cd;

impl builtins::BuiltinCommand for Cd {
    const NAME: &'static str = builtins::CD_NAME;

    const HELP: &'static str = "\
usage: cd [<dir>]

Change the shell working directory to DIR.";

    fn run<T: AsRef<str>>(_shell: &mut Shell, args: &[T], stdout: &mut dyn Write) -> Result<()> {
        match args {
            [] => {
                writeln!(stdout, "cd: please provide a directory")?;
                Ok(())
            }
            [dir] => {
                let dir = dir.as_ref();
                env::set_current_dir(dir)
                    .map_err(|e| Error::builtin_command(format!("cd: {}: {}", dir, e), 1))?;
                debug!("changed directory to {}", dir);
                Ok(())
            }
            _ => Err(Error::builtin_command("cd: too many arguments", 1)),
        }
    }
}

pub struct Pwd;

impl builtins::BuiltinCommand for Pwd {
    const NAME: &'static str = builtins::PWD_NAME;

    const HELP: &'static str = "\
usage: pwd

Print the absolute path of the current working directory.";

    fn run<T: AsRef<str>>(_shell: &mut Shell, _args: &[T], stdout: &mut dyn Write) -> Result<()> {
        let cwd = env::current_dir()?;
        writeln!(stdout, "{}", cwd.display())?;
        Ok(())
    }
}
