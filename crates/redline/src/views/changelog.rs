//! Summary & changes tab

use super::{html_to_text, wrap_text};
use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use redline_core::Changelog;

const CONTEXT_INDENT: &str = "    ";

/// Render the changelog summary and the list of changes with citation links
pub fn render_changelog(frame: &mut Frame, app: &App, area: Rect) {
    let Some(result) = app.result() else {
        return;
    };
    let changelog = &result.changelog;

    let inner_width = area.width.saturating_sub(2) as usize;
    let summary_lines = summary_lines(app, changelog, inner_width);
    let summary_height = (summary_lines.len() as u16 + 2).min(area.height / 2).max(3);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(summary_height), Constraint::Min(0)])
        .split(area);

    let summary = Paragraph::new(summary_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Summary ")
            .border_style(Style::default().fg(app.theme.border)),
    );
    frame.render_widget(summary, chunks[0]);

    render_change_list(frame, app, changelog, chunks[1]);
}

fn summary_lines(app: &App, changelog: &Changelog, width: usize) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = wrap_text(&changelog.summary, width)
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(app.theme.text))))
        .collect();

    let extras = [
        (changelog.warning.as_deref(), app.theme.warning),
        (changelog.error.as_deref(), app.theme.error),
        (changelog.details.as_deref(), app.theme.text_muted),
    ];
    for (text, color) in extras {
        let Some(text) = text else {
            continue;
        };
        lines.extend(
            wrap_text(text, width)
                .into_iter()
                .map(|l| Line::from(Span::styled(l, Style::default().fg(color)))),
        );
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "No summary available",
            Style::default().fg(app.theme.text_muted),
        )));
    }
    lines
}

fn render_change_list(frame: &mut Frame, app: &App, changelog: &Changelog, area: Rect) {
    let title = format!(" Detailed Changes ({}) ", changelog.changes.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(app.theme.border));

    if changelog.changes.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No changes reported",
            Style::default().fg(app.theme.text_muted),
        )))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    // Two columns for the highlight symbol
    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = changelog
        .changes
        .iter()
        .enumerate()
        .map(|(idx, change)| {
            let mut lines = Vec::new();

            let number = format!("{}. ", idx + 1);
            let desc_width = width.saturating_sub(number.len());
            let mut desc_lines = wrap_text(&change.description, desc_width).into_iter();
            let first = desc_lines.next().unwrap_or_default();
            let mut head = vec![
                Span::styled(number.clone(), Style::default().fg(app.theme.text_muted)),
                Span::styled(
                    first,
                    Style::default()
                        .fg(app.theme.text)
                        .add_modifier(Modifier::BOLD),
                ),
            ];
            if let Some(line) = app.session.citation_line(idx) {
                head.push(Span::raw("  "));
                head.push(Span::styled(
                    format!("↗ Line {}", line),
                    Style::default()
                        .fg(app.theme.accent)
                        .add_modifier(Modifier::UNDERLINED),
                ));
            }
            lines.push(Line::from(head));
            let pad = " ".repeat(number.len());
            for rest in desc_lines {
                lines.push(Line::from(Span::styled(
                    format!("{}{}", pad, rest),
                    Style::default()
                        .fg(app.theme.text)
                        .add_modifier(Modifier::BOLD),
                )));
            }

            let context = html_to_text(&change.context);
            for line in wrap_text(&context, width.saturating_sub(CONTEXT_INDENT.len())) {
                lines.push(Line::from(Span::styled(
                    format!("{}{}", CONTEXT_INDENT, line),
                    Style::default().fg(app.theme.text_muted),
                )));
            }
            lines.push(Line::from(""));

            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_symbol("▌ ")
        .highlight_style(Style::default().fg(app.theme.primary));

    let mut state = ListState::default();
    state.select(Some(app.selected_change.min(changelog.changes.len() - 1)));
    frame.render_stateful_widget(list, area, &mut state);
}
