//! Msh Parser
//!
//! Splits a raw input line into an argument vector. Quotes are not
//! interpreted: `echo "a b"` yields the words `echo`, `"a` and `b"`.

const BACKGROUND_OPERATOR: char = '&';
const WORD_SEPARATORS: &[char] = &[' ', '\t', '\n'];

/// One accepted input line.
#[derive(Clone, Debug, PartialEq)]
pub struct Command {
    /// The line as it was read, without surrounding whitespace.
    pub input: String,
    /// Never empty; `argv[0]` names the program or builtin.
    pub argv: Vec<String>,
    pub background: bool,
}

impl Command {
    /// Returns `None` for lines without any words, e.g. blank lines or a lone `&`.
    pub fn parse(input: &str) -> Option<Self> {
        let (argv, background) = tokenize(input);
        if argv.is_empty() {
            return None;
        }

        let command = Command {
            input: input.trim().to_string(),
            argv,
            background,
        };
        debug!("parsed Command: {:?}", command);
        Some(command)
    }
}

/// Returns the words of `input` and whether it contained a background marker.
///
/// Every `&` is treated as whitespace, so it never shows up as a word.
pub fn tokenize(input: &str) -> (Vec<String>, bool) {
    let background = input.contains(BACKGROUND_OPERATOR);
    let line = input.replace(BACKGROUND_OPERATOR, " ");
    let argv = line
        .split(WORD_SEPARATORS)
        .filter_map(truncate_at_control)
        .map(str::to_string)
        .collect();
    (argv, background)
}

/// A control character inside a word ends that word.
fn truncate_at_control(word: &str) -> Option<&str> {
    let end = word
        .find(|c: char| c.is_ascii() && c as u32 <= 32)
        .unwrap_or_else(|| word.len());
    let word = &word[..end];
    if word.is_empty() {
        None
    } else {
        Some(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(input: &str) -> Vec<String> {
        tokenize(input).0
    }

    #[test]
    fn test_simple_command() {
        assert_eq!(
            tokenize("ls -l /tmp\n"),
            (vec!["ls".into(), "-l".into(), "/tmp".into()], false)
        );
    }

    #[test]
    fn test_runs_of_whitespace() {
        assert_eq!(words("  echo \t\t a   b  \n"), vec!["echo", "a", "b"]);
    }

    #[test]
    fn test_blank_lines() {
        assert_eq!(tokenize(""), (vec![], false));
        assert_eq!(tokenize(" \t \n"), (vec![], false));
        assert_eq!(Command::parse("   \t\n"), None);
    }

    #[test]
    fn test_background() {
        assert_eq!(tokenize("sleep 5 &"), (vec!["sleep".into(), "5".into()], true));
        assert_eq!(tokenize("sleep 5&\n"), (vec!["sleep".into(), "5".into()], true));
        assert_eq!(tokenize("  sleep 5   &   "), (vec!["sleep".into(), "5".into()], true));
    }

    #[test]
    fn test_background_marker_is_never_a_word() {
        for line in &["a &", "a&", "& a", "a & b", "a && b", "a&b&"] {
            let (argv, background) = tokenize(line);
            assert!(background, "{:?}", line);
            assert!(argv.iter().all(|w| !w.contains('&')), "{:?}", line);
        }
    }

    #[test]
    fn test_lone_background_marker() {
        assert_eq!(tokenize("&"), (vec![], true));
        assert_eq!(Command::parse(" & "), None);
    }

    #[test]
    fn test_control_characters_end_a_word() {
        assert_eq!(words("ls\r\n"), vec!["ls"]);
        assert_eq!(words("ab\x07cd ef"), vec!["ab", "ef"]);
        assert_eq!(words("\x01 ls"), vec!["ls"]);
    }

    #[test]
    fn test_non_ascii_words_are_kept() {
        assert_eq!(words("echo héllo wörld"), vec!["echo", "héllo", "wörld"]);
    }

    #[test]
    fn test_quotes_are_not_interpreted() {
        assert_eq!(words(r#"echo "a b""#), vec!["echo", "\"a", "b\""]);
    }

    #[test]
    fn test_operators_are_separate_words() {
        assert_eq!(words("ls | wc > out"), vec!["ls", "|", "wc", ">", "out"]);
        assert_eq!(words("ls>out"), vec!["ls>out"]);
    }

    #[test]
    fn test_parse_keeps_trimmed_input() {
        let command = Command::parse("  sleep 1 &\n").unwrap();
        assert_eq!(command.input, "sleep 1 &");
        assert_eq!(command.argv, vec!["sleep", "1"]);
        assert!(command.background);
    }
}
