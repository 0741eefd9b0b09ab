//! Windowed diff view
//!
//! Only lines inside the viewport's visible range (plus buffer) are turned
//! into widgets. Each one is placed by its absolute offset relative to the
//! scroll position, so rows above or below the terminal are skipped.

use super::{expand_tabs, slice_columns};
use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};
use redline_core::{LineKind, RenderedLine};

/// Minimum digits reserved for line numbers
const MIN_NUMBER_WIDTH: usize = 3;

/// Score header above the scrolling body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffLayout {
    pub header: Rect,
    pub body: Rect,
}

pub fn diff_layout(area: Rect) -> DiffLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);
    DiffLayout {
        header: chunks[0],
        body: chunks[1],
    }
}

fn number_width(line_count: usize) -> usize {
    line_count.max(1).to_string().len().max(MIN_NUMBER_WIDTH)
}

/// Render the differences tab
pub fn render_diff_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let layout = diff_layout(area);
    render_score_header(frame, app, layout.header);

    app.observe_diff_area(layout.body.height);

    let line_count = app.viewport.document().line_count();
    if line_count == 0 {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No differences to show",
            Style::default().fg(app.theme.text_muted),
        )));
        frame.render_widget(empty, layout.body);
        return;
    }

    let number_width = number_width(line_count);
    let gutter_width = if app.line_numbers {
        number_width + 3
    } else {
        0
    };
    let show_scrollbar = app.scrollbar_visible && app.viewport.max_scroll() > 0.0;
    let reserved = gutter_width + usize::from(show_scrollbar);
    let content_width = (layout.body.width as usize).saturating_sub(reserved);
    app.clamp_horizontal_scroll(content_width);

    let rows = build_rows(app, layout.body.height as usize, number_width, content_width);
    let mut paragraph = Paragraph::new(rows);
    if let Some(bg) = app.theme.background {
        paragraph = paragraph.style(Style::default().bg(bg));
    }
    frame.render_widget(paragraph, layout.body);

    if show_scrollbar {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));
        let mut scrollbar_state = ScrollbarState::new(line_count)
            .viewport_content_length(app.viewport.page_lines())
            .position(app.viewport.first_visible_index());
        frame.render_stateful_widget(scrollbar, layout.body, &mut scrollbar_state);
    }
}

fn render_score_header(frame: &mut Frame, app: &App, area: Rect) {
    let Some(result) = app.result() else {
        return;
    };
    let score = result.similarity_score;
    let score_color = if score >= 0.8 {
        app.theme.success
    } else if score >= 0.5 {
        app.theme.warning
    } else {
        app.theme.error
    };

    let line = Line::from(vec![
        Span::styled(" Similarity Score: ", Style::default().fg(app.theme.text_muted)),
        Span::styled(
            result.similarity_percent(),
            Style::default()
                .fg(score_color)
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// One terminal row per body row; rows with no line in the window stay blank
fn build_rows(
    app: &App,
    height: usize,
    number_width: usize,
    content_width: usize,
) -> Vec<Line<'static>> {
    let line_height = app.viewport.config().line_height;
    let scroll_offset = app.viewport.state().scroll_offset;
    let mut rows = vec![Line::default(); height];

    for line in app.viewport.visible_lines() {
        let y = line.offset - scroll_offset;
        if y < 0.0 {
            continue;
        }
        let row = (y / line_height).floor() as usize;
        if row >= height {
            continue;
        }
        rows[row] = render_line(app, &line, number_width, content_width);
    }
    rows
}

fn render_line(
    app: &App,
    line: &RenderedLine<'_>,
    number_width: usize,
    content_width: usize,
) -> Line<'static> {
    let theme = &app.theme;
    let cited = app.scroll_to_line == Some(line.line_number);

    let text_style = match line.kind {
        LineKind::Addition => Style::default().fg(theme.diff_added),
        LineKind::Deletion => Style::default().fg(theme.diff_removed),
        LineKind::Context => Style::default().fg(theme.diff_context),
    };
    let text_style = if cited {
        text_style.add_modifier(Modifier::BOLD)
    } else {
        text_style
    };

    let mut spans = Vec::with_capacity(3);
    if app.line_numbers {
        let marker = if cited { "▶" } else { " " };
        spans.push(Span::styled(
            marker,
            Style::default().fg(theme.accent),
        ));
        spans.push(Span::styled(
            format!("{:>width$} ", line.line_number, width = number_width),
            Style::default().fg(if cited {
                theme.accent
            } else {
                theme.diff_line_number
            }),
        ));
        let rule_color = match line.kind {
            LineKind::Addition => theme.added_dim(),
            LineKind::Deletion => theme.removed_dim(),
            LineKind::Context => theme.border,
        };
        spans.push(Span::styled("│", Style::default().fg(rule_color)));
    }

    let text = expand_tabs(line.text);
    spans.push(Span::styled(
        slice_columns(&text, app.horizontal_scroll, content_width),
        text_style,
    ));
    Line::from(spans)
}
