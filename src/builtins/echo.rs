use crate::builtins::{self, prelude::*};

pub struct Echo;

impl builtins::BuiltinCommand for Echo {
    const NAME: &'static str = builtins::ECHO_NAME;

    const HELP: &'static str = "\
usage: echo [<word>...]

Write each WORD followed by a single space, then a newline.";

    fn run<T: AsRef<str>>(_shell: &mut Shell, args: &[T], stdout: &mut dyn Write) -> Result<()> {
        let mut line = String::new();
        for arg in args {
            line.push_str(arg.as_ref());
            line.push(' ');
        }

        writeln!(stdout, "{}", line)?;
        Ok(())
    }
}
