//! Error module. See the [error-chain](https://crates.io/crates/error-chain) crate for details.

error_chain! {
    foreign_links {
        Docopt(::docopt::Error);
        Io(::std::io::Error);
        Nix(::nix::Error);
        Readline(::rustyline::error::ReadlineError);
    }

    errors {
        /// Line that tokenized fine but cannot be dispatched, e.g. `ls >`
        Syntax(detail: String) {
            description("syntax error")
            display("syntax error: {}", detail)
        }

        /// A builtin failed; `code` becomes the shell's last exit status
        BuiltinCommand(message: String, code: i32) {
            description("builtin command error")
            display("{}", message)
        }

        CommandNotFound(command: String) {
            description("command not found")
            display("{}: command not found", command)
        }

        NoSuchJob(job: String) {
            description("no such job")
            display("{}: no such job", job)
        }

        JobTableFull(capacity: usize) {
            description("job table full")
            display("job table full ({} jobs)", capacity)
        }

        DuplicateJob(pid: u32) {
            description("duplicate job")
            display("a job with pid {} is already registered", pid)
        }
    }
}

impl Error {
    pub(crate) fn syntax<T: AsRef<str>>(detail: T) -> Error {
        Error::from(ErrorKind::Syntax(detail.as_ref().to_string()))
    }

    pub(crate) fn builtin_command<T: AsRef<str>>(message: T, code: i32) -> Error {
        Error::from(ErrorKind::BuiltinCommand(message.as_ref().to_string(), code))
    }

    pub(crate) fn command_not_found<T: AsRef<str>>(command: T) -> Error {
        Error::from(ErrorKind::CommandNotFound(command.as_ref().to_string()))
    }

    pub(crate) fn no_such_job<T: AsRef<str>>(job: T) -> Error {
        Error::from(ErrorKind::NoSuchJob(job.as_ref().to_string()))
    }
}
