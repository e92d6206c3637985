// ============================================================
// CSV PARSER
// ============================================================
// Parse published-sheet CSV exports without ever failing

use crate::domain::csv::{trim_field, CsvRow};

/// Line-oriented CSV parser with RFC-4180 style quoting.
///
/// Each non-blank physical line becomes one row. A quoted field that spans
/// lines is split into separate rows; sheet exports used here never contain
/// multi-line cells. Malformed quoting degrades to a best-effort split.
pub struct CsvParser {
    /// Field separator (default: comma)
    delimiter: char,

    /// Quote character (default: double quote)
    quote: char,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote: '"',
        }
    }
}

impl CsvParser {
    /// Create a new CSV parser with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse CSV content into rows, one per non-blank line
    pub fn parse_content(&self, content: &str) -> Vec<CsvRow> {
        Self::physical_lines(content)
            .map(|line| CsvRow::new(self.parse_line(line)))
            .collect()
    }

    /// Split a single line into trimmed fields.
    ///
    /// Outside quotes the delimiter ends a field and a quote opens a quoted
    /// section. Inside quotes a doubled quote is a literal quote and a lone
    /// quote closes the section. Whatever is buffered at end of line is kept
    /// even if a quote was never closed.
    pub fn parse_line(&self, line: &str) -> Vec<String> {
        let mut fields = Vec::new();
        let mut current = String::new();
        let mut in_quotes = false;
        let mut chars = line.chars().peekable();

        while let Some(ch) = chars.next() {
            if ch == self.quote {
                if in_quotes && chars.peek() == Some(&self.quote) {
                    current.push(self.quote);
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
                continue;
            }

            if ch == self.delimiter && !in_quotes {
                fields.push(trim_field(&current).to_string());
                current.clear();
                continue;
            }

            current.push(ch);
        }

        fields.push(trim_field(&current).to_string());
        fields
    }

    /// Normalize `\r\n` and bare `\r` to `\n`, then drop blank lines.
    fn physical_lines(content: &str) -> impl Iterator<Item = &str> {
        content
            .split("\r\n")
            .flat_map(|chunk| chunk.split(['\r', '\n']))
            .filter(|line| !trim_field(line).is_empty())
    }
}
