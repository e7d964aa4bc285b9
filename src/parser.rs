//! Splits a raw input line into its command text, expected-output field and
//! trailing comment.
//!
//! The line format is `command params... ; expected-output # comment`. The
//! comment is stripped first, so a `;` inside a comment is ignored; the
//! expected-output field is only consulted by the file-based test runner.

/// Character that starts the expected-output field.
pub const EXPECTED_SEPARATOR: char = ';';

/// Character that starts a trailing comment.
pub const COMMENT_MARKER: char = '#';

/// A raw input line split into its three fields, each trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    /// Command name and parameters, still unsplit.
    pub command: String,
    /// Expected output for the test runner; empty when absent.
    pub expected: String,
    /// Comment text; empty when absent.
    pub comment: String,
}

/// Splits `line` at the comment marker and the expected-output separator.
pub fn parse_line(line: &str) -> ParsedLine {
    let (rest, comment) = split_field(line, COMMENT_MARKER);
    let (command, expected) = split_field(rest, EXPECTED_SEPARATOR);
    ParsedLine {
        command: command.to_string(),
        expected: expected.to_string(),
        comment: comment.to_string(),
    }
}

/// Splits the command text of a parsed line into whitespace-separated
/// words. The first word is the command name, the rest are parameters.
pub fn split_words(command: &str) -> Vec<&str> {
    command.split_whitespace().collect()
}

fn split_field(text: &str, marker: char) -> (&str, &str) {
    match text.split_once(marker) {
        Some((before, after)) => (before.trim(), after.trim()),
        None => (text.trim(), ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_command_line() {
        let parsed = parse_line("append 10");
        assert_eq!(parsed.command, "append 10");
        assert_eq!(parsed.expected, "");
        assert_eq!(parsed.comment, "");
    }

    #[test]
    fn test_expected_output_field() {
        let parsed = parse_line("get 0 ; 10");
        assert_eq!(parsed.command, "get 0");
        assert_eq!(parsed.expected, "10");
    }

    #[test]
    fn test_comment_field() {
        let parsed = parse_line("size # how many so far?");
        assert_eq!(parsed.command, "size");
        assert_eq!(parsed.expected, "");
        assert_eq!(parsed.comment, "how many so far?");
    }

    #[test]
    fn test_all_three_fields() {
        let parsed = parse_line("  get 1 ; 20 # second element  ");
        assert_eq!(parsed.command, "get 1");
        assert_eq!(parsed.expected, "20");
        assert_eq!(parsed.comment, "second element");
    }

    #[test]
    fn test_separator_inside_comment_is_ignored() {
        let parsed = parse_line("size # expected ; is not a field here");
        assert_eq!(parsed.command, "size");
        assert_eq!(parsed.expected, "");
        assert_eq!(parsed.comment, "expected ; is not a field here");
    }

    #[test]
    fn test_empty_expected_field() {
        let parsed = parse_line("append 5 ;");
        assert_eq!(parsed.command, "append 5");
        assert_eq!(parsed.expected, "");
    }

    #[test]
    fn test_blank_and_comment_only_lines() {
        assert_eq!(parse_line("").command, "");
        assert_eq!(parse_line("   ").command, "");
        let parsed = parse_line("# just a note");
        assert_eq!(parsed.command, "");
        assert_eq!(parsed.comment, "just a note");
    }

    #[test]
    fn test_split_words() {
        assert_eq!(split_words("insertat 15 2"), vec!["insertat", "15", "2"]);
        assert_eq!(split_words("  size  "), vec!["size"]);
        assert!(split_words("").is_empty());
    }
}
