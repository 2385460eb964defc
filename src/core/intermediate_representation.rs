//! Classifies a parsed line into the way it will be executed: a builtin, a
//! single external command (optionally redirected), or a two-stage pipeline.

use crate::builtins;
use crate::core::parser;
use crate::errors::{Error, Result};

const PIPE_OPERATOR: &str = "|";
const REDIRECT_OPERATOR: &str = ">";

#[derive(Clone, Debug, PartialEq)]
pub enum Stdio {
    Inherit,
    Filename(String),
}

impl Default for Stdio {
    fn default() -> Self {
        Stdio::Inherit
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SimpleCommand {
    pub program: String,
    pub args: Vec<String>,
    pub stdout: Stdio,
}

impl SimpleCommand {
    /// precondition: `words` is non-empty.
    fn new(mut words: Vec<String>, stdout: Stdio) -> Self {
        let program = words.remove(0);
        SimpleCommand {
            program,
            args: words,
            stdout,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Runs inside the shell; receives every word after the name verbatim.
    Builtin { program: String, args: Vec<String> },
    Simple(SimpleCommand),
    /// `first`'s stdout feeds `second`'s stdin.
    Pipeline {
        first: SimpleCommand,
        second: SimpleCommand,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct CommandGroup {
    /// The words of the line joined by single spaces, used for job listings.
    pub input: String,
    pub command: Command,
    pub background: bool,
}

#[derive(Debug)]
pub struct Interpreter;

impl Interpreter {
    /// Decides how `input` runs, in this order: builtin name, single `|`,
    /// `>` redirect, plain command.
    pub fn parse(input: parser::Command) -> Result<CommandGroup> {
        let background = input.background;
        let text = input.argv.join(" ");
        let command = classify(input.argv, background)?;
        Ok(CommandGroup {
            input: text,
            command,
            background,
        })
    }
}

fn classify(mut argv: Vec<String>, background: bool) -> Result<Command> {
    debug_assert!(!argv.is_empty());

    if builtins::is_builtin(&argv[0]) {
        let program = argv.remove(0);
        return Ok(Command::Builtin {
            program,
            args: argv,
        });
    }

    let pipes: Vec<usize> = argv
        .iter()
        .enumerate()
        .filter(|&(_, word)| word == PIPE_OPERATOR)
        .map(|(index, _)| index)
        .collect();
    match pipes.as_slice() {
        [] => parse_redirect(argv),
        &[index] => {
            if background {
                return Err(Error::syntax("background pipelines are not supported"));
            }

            let second = argv.split_off(index + 1);
            argv.truncate(index);
            if argv.is_empty() || second.is_empty() {
                return Err(Error::syntax("`|' needs a command on both sides"));
            }

            Ok(Command::Pipeline {
                first: SimpleCommand::new(argv, Stdio::Inherit),
                second: SimpleCommand::new(second, Stdio::Inherit),
            })
        }
        _ => Err(Error::syntax("only a single `|' is supported")),
    }
}

/// The word after `>` names the output file; both words are removed.
fn parse_redirect(mut argv: Vec<String>) -> Result<Command> {
    let redirects: Vec<usize> = argv
        .iter()
        .enumerate()
        .filter(|(_, word)| word.as_str() == REDIRECT_OPERATOR)
        .map(|(index, _)| index)
        .collect();
    let index = match redirects.as_slice() {
        [] => return Ok(Command::Simple(SimpleCommand::new(argv, Stdio::Inherit))),
        [index] => *index,
        _ => return Err(Error::syntax("only a single `>' is supported")),
    };

    let filename = argv
        .get(index + 1)
        .cloned()
        .ok_or_else(|| Error::syntax("expected a filename after `>'"))?;
    argv.drain(index..=index + 1);
    if argv.is_empty() {
        return Err(Error::syntax("expected a command before `>'"));
    }

    Ok(Command::Simple(SimpleCommand::new(
        argv,
        Stdio::Filename(filename),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    struct SimpleCommandBuilder(SimpleCommand);

    impl SimpleCommandBuilder {
        fn new(program: &str) -> Self {
            SimpleCommandBuilder(SimpleCommand {
                program: program.into(),
                args: vec![],
                stdout: Stdio::Inherit,
            })
        }

        fn arg(mut self, arg: &str) -> Self {
            self.0.args.push(arg.to_string());
            self
        }

        fn stdout(self, stdout: Stdio) -> Self {
            SimpleCommandBuilder(SimpleCommand { stdout, ..self.0 })
        }

        fn build(self) -> SimpleCommand {
            self.0
        }
    }

    fn parse(input: &str) -> Result<CommandGroup> {
        Interpreter::parse(parser::Command::parse(input).expect("input should have words"))
    }

    fn assert_syntax_error(input: &str) {
        match parse(input) {
            Err(e) => match *e.kind() {
                ErrorKind::Syntax(_) => (),
                ref kind => panic!("expected syntax error for {:?}, got {:?}", input, kind),
            },
            Ok(group) => panic!("expected syntax error for {:?}, got {:?}", input, group),
        }
    }

    #[test]
    fn test_simple_command() {
        let group = parse("ls -l /tmp").unwrap();
        assert_eq!(
            group,
            CommandGroup {
                input: "ls -l /tmp".into(),
                command: Command::Simple(
                    SimpleCommandBuilder::new("ls").arg("-l").arg("/tmp").build()
                ),
                background: false,
            }
        );
    }

    #[test]
    fn test_builtins_take_every_word() {
        assert_eq!(
            parse("echo a | b > c").unwrap().command,
            Command::Builtin {
                program: "echo".into(),
                args: vec!["a".into(), "|".into(), "b".into(), ">".into(), "c".into()],
            }
        );
        assert_eq!(
            parse("jobs &").unwrap().command,
            Command::Builtin {
                program: "jobs".into(),
                args: vec![],
            }
        );
    }

    #[test]
    fn test_builtin_names_are_case_sensitive() {
        assert_eq!(
            parse("ECHO hi").unwrap().command,
            Command::Simple(SimpleCommandBuilder::new("ECHO").arg("hi").build())
        );
    }

    #[test]
    fn test_pipeline() {
        assert_eq!(
            parse("cat file | grep needle").unwrap().command,
            Command::Pipeline {
                first: SimpleCommandBuilder::new("cat").arg("file").build(),
                second: SimpleCommandBuilder::new("grep").arg("needle").build(),
            }
        );
    }

    #[test]
    fn test_redirect_inside_pipeline_is_a_word() {
        assert_eq!(
            parse("ls | grep >").unwrap().command,
            Command::Pipeline {
                first: SimpleCommandBuilder::new("ls").build(),
                second: SimpleCommandBuilder::new("grep").arg(">").build(),
            }
        );
    }

    #[test]
    fn test_pipeline_errors() {
        assert_syntax_error("ls | wc | wc");
        assert_syntax_error("| wc");
        assert_syntax_error("ls |");
        assert_syntax_error("ls | wc &");
    }

    #[test]
    fn test_redirect() {
        let group = parse("ls -l > out.txt").unwrap();
        assert_eq!(
            group.command,
            Command::Simple(
                SimpleCommandBuilder::new("ls")
                    .arg("-l")
                    .stdout(Stdio::Filename("out.txt".into()))
                    .build()
            )
        );
        assert_eq!(group.input, "ls -l > out.txt");
    }

    #[test]
    fn test_redirect_in_the_middle() {
        assert_eq!(
            parse("ls > out.txt -a").unwrap().command,
            Command::Simple(
                SimpleCommandBuilder::new("ls")
                    .arg("-a")
                    .stdout(Stdio::Filename("out.txt".into()))
                    .build()
            )
        );
    }

    #[test]
    fn test_redirect_errors() {
        assert_syntax_error("ls >");
        assert_syntax_error("> out.txt");
        assert_syntax_error("ls > a > b");
        assert_syntax_error("ls > >");
    }

    #[test]
    fn test_background_redirect() {
        let group = parse("sleep 1 > out &").unwrap();
        assert!(group.background);
        assert_eq!(group.input, "sleep 1 > out");
        assert_eq!(
            group.command,
            Command::Simple(
                SimpleCommandBuilder::new("sleep")
                    .arg("1")
                    .stdout(Stdio::Filename("out".into()))
                    .build()
            )
        );
    }
}
