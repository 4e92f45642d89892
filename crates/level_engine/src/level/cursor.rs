//! Forward-only line cursor shared by every nesting level

use std::iter::Peekable;
use std::str::Lines;

use super::variables::VariableTable;

/// Keyword closing the innermost open block
pub const TERMINATOR: &str = "End";

/// A substituted, non-blank, non-comment line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// 1-based line number in the source
    pub number: usize,
    /// Line text after trimming and variable substitution
    pub text: String,
}

impl SourceLine {
    /// Whitespace-separated tokens
    pub fn tokens(&self) -> Vec<&str> {
        self.text.split_whitespace().collect()
    }

    /// First token, or an empty string
    pub fn keyword(&self) -> &str {
        self.text.split_whitespace().next().unwrap_or("")
    }

    /// Whether the line opens with the block terminator
    pub fn is_terminator(&self) -> bool {
        self.keyword() == TERMINATOR
    }
}

/// Single-pass cursor over the lines of a level source
///
/// Nested readers take it by `&mut`, so a block that consumes its `End`
/// hands the cursor back positioned on the following line.
pub struct LineCursor<'a> {
    lines: Peekable<Lines<'a>>,
    line_number: usize,
}

impl<'a> LineCursor<'a> {
    /// Create a cursor at the start of `source`
    pub fn new(source: &'a str) -> Self {
        Self {
            lines: source.lines().peekable(),
            line_number: 0,
        }
    }

    /// Number of the last line handed out (0 before the first read)
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Next raw line, trimmed
    pub fn next_raw(&mut self) -> Option<&'a str> {
        let line = self.lines.next()?;
        self.line_number += 1;
        Some(line.trim())
    }

    /// Look at the next raw line without consuming it
    pub fn peek_raw(&mut self) -> Option<&'a str> {
        self.lines.peek().map(|line| line.trim())
    }

    /// Next meaningful line: skips blanks and `#` comments, then substitutes
    /// variables
    pub fn next_line(&mut self, variables: &VariableTable) -> Option<SourceLine> {
        while let Some(raw) = self.next_raw() {
            if raw.is_empty() || raw.starts_with('#') {
                continue;
            }
            let text = variables.substitute(raw);
            return Some(SourceLine {
                number: self.line_number,
                text: text.trim().to_string(),
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_comments_and_blanks() {
        let source = "# header\n\n   \nObject\n  # inside\n  End\n";
        let vars = VariableTable::new();
        let mut cursor = LineCursor::new(source);

        let first = cursor.next_line(&vars).unwrap();
        assert_eq!(first.text, "Object");
        assert_eq!(first.number, 4);

        let second = cursor.next_line(&vars).unwrap();
        assert!(second.is_terminator());
        assert_eq!(second.number, 6);

        assert!(cursor.next_line(&vars).is_none());
    }

    #[test]
    fn test_substitutes_after_trimming() {
        let mut vars = VariableTable::new();
        vars.set("x", "4");
        let mut cursor = LineCursor::new("    Position ${x} 1");
        let line = cursor.next_line(&vars).unwrap();
        assert_eq!(line.tokens(), vec!["Position", "4", "1"]);
    }

    #[test]
    fn test_peek_does_not_advance() {
        let mut cursor = LineCursor::new("a\nb");
        assert_eq!(cursor.peek_raw(), Some("a"));
        assert_eq!(cursor.line_number(), 0);
        assert_eq!(cursor.next_raw(), Some("a"));
        assert_eq!(cursor.peek_raw(), Some("b"));
    }
}
