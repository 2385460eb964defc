//! Line sources for the read-eval loop.
//!
//! A terminal gets a prompt and the line editor; anything else (a pipe, a
//! script file) is read line by line without a prompt.

use std::fmt;
use std::io::{self, BufRead, IsTerminal};

use rustyline::{error::ReadlineError, Config, DefaultEditor};

use crate::errors::Result;

/// Returns one line per call, or `None` once the input is exhausted.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Terminal line source. History is never recorded.
pub struct Editor {
    internal: DefaultEditor,
}

impl Editor {
    pub fn new() -> Result<Editor> {
        let config = Config::builder().auto_add_history(false).build();
        let internal = DefaultEditor::with_config(config)?;
        Ok(Editor { internal })
    }
}

impl LineSource for Editor {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.internal.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Eof) => Ok(None),
            // ^C discards the current line
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(e) => Err(e.into()),
        }
    }
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Editor")
    }
}

/// Reads lines from any buffered reader, ignoring the prompt.
pub struct LineReader<R> {
    reader: R,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        LineReader { reader }
    }
}

impl<R: BufRead> LineSource for LineReader<R> {
    fn read_line(&mut self, _prompt: &str) -> Result<Option<String>> {
        let mut line = Vec::new();
        if self.reader.read_until(b'\n', &mut line)? == 0 {
            return Ok(None);
        }

        // invalid UTF-8 is replaced, not rejected
        Ok(Some(String::from_utf8_lossy(&line).into_owned()))
    }
}

impl<R> fmt::Debug for LineReader<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineReader")
    }
}

/// Whether the shell is reading commands from a terminal.
pub fn stdin_is_interactive() -> bool {
    io::stdin().is_terminal()
}

/// The editor when stdin is a terminal, a plain reader otherwise.
pub fn stdin_source() -> Result<Box<dyn LineSource>> {
    if stdin_is_interactive() {
        Ok(Box::new(Editor::new()?))
    } else {
        Ok(Box::new(LineReader::new(io::stdin().lock())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_line_reader() {
        let mut source = LineReader::new(Cursor::new("echo a\n\nls -l"));
        assert_eq!(source.read_line("> ").unwrap(), Some("echo a\n".to_string()));
        assert_eq!(source.read_line("> ").unwrap(), Some("\n".to_string()));
        assert_eq!(source.read_line("> ").unwrap(), Some("ls -l".to_string()));
        assert_eq!(source.read_line("> ").unwrap(), None);
        assert_eq!(source.read_line("> ").unwrap(), None);
    }

    #[test]
    fn test_line_reader_accepts_invalid_utf8() {
        let mut source = LineReader::new(Cursor::new(&b"echo \xff\nfalse\n"[..]));
        assert_eq!(
            source.read_line("> ").unwrap(),
            Some("echo \u{fffd}\n".to_string())
        );
        assert_eq!(source.read_line("> ").unwrap(), Some("false\n".to_string()));
        assert_eq!(source.read_line("> ").unwrap(), None);
    }
}
