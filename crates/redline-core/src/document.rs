//! Line model for diff text

use serde::{Deserialize, Serialize};

/// Classification of a single diff line, derived from its leading marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Addition,
    Deletion,
    Context,
}

impl LineKind {
    /// Classify a line by its first character (`+`, `-`, anything else)
    pub fn classify(line: &str) -> Self {
        match line.as_bytes().first() {
            Some(b'+') => LineKind::Addition,
            Some(b'-') => LineKind::Deletion,
            _ => LineKind::Context,
        }
    }

    /// Marker shown in the gutter
    pub fn marker(self) -> &'static str {
        match self {
            LineKind::Addition => "+",
            LineKind::Deletion => "-",
            LineKind::Context => " ",
        }
    }
}

/// Ordered, immutable line sequence built once per comparison result
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffDocument {
    lines: Vec<String>,
}

impl DiffDocument {
    /// Split diff text on `\n`. Empty text has no lines.
    pub fn new(diff_text: &str) -> Self {
        if diff_text.is_empty() {
            return Self::default();
        }
        Self {
            lines: diff_text.split('\n').map(str::to_string).collect(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line text by 0-based index
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Line text by 1-based line number
    pub fn line_at(&self, line_number: usize) -> Option<&str> {
        line_number.checked_sub(1).and_then(|idx| self.line(idx))
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Count of (additions, deletions)
    pub fn stats(&self) -> (usize, usize) {
        self.lines
            .iter()
            .fold((0, 0), |(adds, dels), line| match LineKind::classify(line) {
                LineKind::Addition => (adds + 1, dels),
                LineKind::Deletion => (adds, dels + 1),
                LineKind::Context => (adds, dels),
            })
    }

    /// Widest line in characters, used for horizontal scroll clamping
    pub fn max_line_len(&self) -> usize {
        self.lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
    }
}
