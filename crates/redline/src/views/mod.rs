//! View rendering modules

mod changelog;
mod diff_view;

pub use changelog::render_changelog;
pub use diff_view::{diff_layout, render_diff_view};

use regex::Regex;
use std::sync::OnceLock;
use unicode_width::UnicodeWidthChar;

const TAB_WIDTH: usize = 4;

/// Expand tabs so column math matches what the terminal shows
pub(crate) fn expand_tabs(text: &str) -> String {
    if text.contains('\t') {
        text.replace('\t', &" ".repeat(TAB_WIDTH))
    } else {
        text.to_string()
    }
}

/// Take `width` display columns of `text`, starting `skip` columns in.
/// Wide characters straddling either edge are dropped.
pub(crate) fn slice_columns(text: &str, skip: usize, width: usize) -> String {
    let mut out = String::new();
    let mut col = 0usize;
    let end = skip.saturating_add(width);
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if col >= end {
            break;
        }
        if col >= skip && col + w <= end {
            out.push(ch);
        }
        col += w;
    }
    out
}

/// Word-wrap `text` to `width` columns. Words wider than a line are split.
pub(crate) fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0usize;

        for word in paragraph.split_whitespace() {
            let word_width: usize = word.chars().map(|c| c.width().unwrap_or(0)).sum();
            let needed = if current.is_empty() {
                word_width
            } else {
                current_width + 1 + word_width
            };

            if needed <= width {
                if !current.is_empty() {
                    current.push(' ');
                    current_width += 1;
                }
                current.push_str(word);
                current_width += word_width;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }

            for ch in word.chars() {
                let w = ch.width().unwrap_or(0);
                if current_width + w > width && !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(ch);
                current_width += w;
            }
        }

        lines.push(current);
    }

    // Drop blank lines left by trailing newlines, keep interior spacing
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

fn tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern"))
}

fn break_regex() -> &'static Regex {
    static BREAK: OnceLock<Regex> = OnceLock::new();
    BREAK.get_or_init(|| Regex::new(r"(?i)<br\s*/?>|</p>|</li>|</div>").expect("break pattern"))
}

/// Plain text for an HTML fragment: block ends become newlines, other tags
/// are removed and common entities decoded.
pub(crate) fn html_to_text(html: &str) -> String {
    let with_breaks = break_regex().replace_all(html, "\n");
    let stripped = tag_regex().replace_all(&with_breaks, "");
    stripped
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests;
