//! Locate change citations in diff text
//!
//! A change record carries a short search fragment. The fragment is escaped
//! and matched against whole diff lines (optionally starting with a `+` or
//! `-` marker); the first matching line in document order is the citation.
//! A fragment that recurs resolves to its earliest line.

use crate::comparison::Change;
use regex::RegexBuilder;

/// Compiled pattern size cap; larger fragments are treated as unresolvable
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// Resolved citation for one change record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Citation {
    /// 1-based line number, `None` if the fragment was not found
    pub line_number: Option<usize>,
}

impl Citation {
    pub fn is_resolved(&self) -> bool {
        self.line_number.is_some()
    }
}

/// Find the 1-based line number of the first diff line containing
/// `search_string`. Returns `None` for empty input, no match, or a fragment
/// that cannot be compiled into a pattern.
pub fn find_citation(search_string: &str, diff_text: &str) -> Option<usize> {
    let fragment = search_string.trim();
    if fragment.is_empty() || diff_text.is_empty() {
        return None;
    }

    let pattern = format!(r"^[+-]?.*{}.*$", regex::escape(fragment));
    let regex = match RegexBuilder::new(&pattern)
        .multi_line(true)
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()
    {
        Ok(regex) => regex,
        Err(err) => {
            tracing::warn!(fragment, error = %err, "citation pattern failed to build");
            return None;
        }
    };

    let found = regex.find(diff_text)?;
    Some(line_number_at(diff_text, found.start()))
}

/// 1-based line number containing byte offset `pos`
fn line_number_at(text: &str, pos: usize) -> usize {
    text.as_bytes()[..pos].iter().filter(|&&b| b == b'\n').count() + 1
}

/// Resolve every change against `diff_text`, preserving order
pub fn resolve_citations(changes: &[Change], diff_text: &str) -> Vec<Citation> {
    changes
        .iter()
        .map(|change| Citation {
            line_number: find_citation(&change.search_string, diff_text),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "line1\n+added line\n-removed line\nline4";

    #[test]
    fn test_finds_added_line() {
        assert_eq!(find_citation("added line", SAMPLE), Some(2));
    }

    #[test]
    fn test_finds_removed_and_context_lines() {
        assert_eq!(find_citation("removed", SAMPLE), Some(3));
        assert_eq!(find_citation("line4", SAMPLE), Some(4));
        assert_eq!(find_citation("line1", SAMPLE), Some(1));
    }

    #[test]
    fn test_metacharacters_are_literal() {
        let text = "intro\n- total cost $400\n+ total cost (est.) $500\noutro";
        assert_eq!(find_citation("cost (est.)", text), Some(3));
        assert_eq!(find_citation("(est.) $500", text), Some(3));
        assert_eq!(find_citation("[a-z]+", text), None);
        assert_eq!(find_citation("cost (est", text), Some(3));
        assert_eq!(find_citation("a|b\\", text), None);
    }

    #[test]
    fn test_dot_does_not_match_any_char() {
        let text = "version 1x2\nversion 1.2";
        assert_eq!(find_citation("1.2", text), Some(2));
    }

    #[test]
    fn test_not_found() {
        assert_eq!(find_citation("nonexistent phrase", SAMPLE), None);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(find_citation("", SAMPLE), None);
        assert_eq!(find_citation("   ", SAMPLE), None);
        assert_eq!(find_citation("added", ""), None);
        assert_eq!(find_citation("", ""), None);
    }

    #[test]
    fn test_case_sensitive() {
        assert_eq!(find_citation("ADDED LINE", SAMPLE), None);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let text = "a\n+Service Credit\nb\n-Service Credit";
        assert_eq!(find_citation("Service Credit", text), Some(2));
    }

    #[test]
    fn test_fragment_is_trimmed() {
        assert_eq!(find_citation("  added line \n", SAMPLE), Some(2));
    }

    #[test]
    fn test_multibyte_text_before_match() {
        let text = "Überblick — Einführung\n+Verfügbarkeit 99,9 %";
        assert_eq!(find_citation("99,9 %", text), Some(2));
    }

    #[test]
    fn test_deterministic() {
        let a = find_citation("removed line", SAMPLE);
        let b = find_citation("removed line", SAMPLE);
        assert_eq!(a, b);
    }

    #[test]
    fn test_resolve_citations_preserves_order() {
        let changes = vec![
            Change {
                description: "Added".into(),
                search_string: "added line".into(),
                context: String::new(),
            },
            Change {
                description: "Missing".into(),
                search_string: "nothing here".into(),
                context: String::new(),
            },
            Change {
                description: "Removed".into(),
                search_string: "removed line".into(),
                context: String::new(),
            },
        ];
        let citations = resolve_citations(&changes, SAMPLE);
        assert_eq!(
            citations
                .iter()
                .map(|c| c.line_number)
                .collect::<Vec<_>>(),
            vec![Some(2), None, Some(3)]
        );
        assert!(!citations[1].is_resolved());
    }
}
