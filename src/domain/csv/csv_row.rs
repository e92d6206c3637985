// ============================================================
// CSV ROW TYPES
// ============================================================
// Data structures representing parsed CSV content

use once_cell::sync::Lazy;
use regex::Regex;

static HEADER_WHITESPACE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s\x{FEFF}]+").expect("header whitespace pattern is valid"));

/// Trim leading/trailing whitespace, including a byte-order mark.
///
/// Sheet exports sometimes start with U+FEFF, which `str::trim` keeps.
pub fn trim_field(value: &str) -> &str {
    value.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Lowercase a header cell and remove every whitespace character in it,
/// so `" Time "`, `"TIME"` and `"ti me"` all become `"time"`.
pub fn normalize_header(value: &str) -> String {
    HEADER_WHITESPACE_PATTERN
        .replace_all(&value.to_lowercase(), "")
        .into_owned()
}

/// One non-blank physical CSV line split into trimmed fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    /// Trimmed field values, in column order
    pub fields: Vec<String>,
}

impl CsvRow {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    /// Field at `column`, or `""` when the row is too short.
    pub fn get(&self, column: usize) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }

    /// Header cells normalized for column lookup
    pub fn normalized_headers(&self) -> Vec<String> {
        self.fields.iter().map(|f| normalize_header(f)).collect()
    }
}
