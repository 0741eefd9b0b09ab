//! UI rendering for the TUI

use crate::app::{App, Tab};
use crate::views::{diff_layout, render_changelog, render_diff_view};
use redline_core::Stage;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    Frame,
};

/// Shorten a source label to `max_width` columns, keeping the file name
fn shorten_label(label: &str, max_width: usize) -> String {
    if label.width() <= max_width {
        return label.to_string();
    }
    let name = label.rsplit('/').next().unwrap_or(label);
    let with_dir = format!(".../{}", name);
    if name != label && with_dir.width() <= max_width {
        return with_dir;
    }

    let budget = max_width.saturating_sub(1);
    let mut used = 0;
    let mut tail: Vec<char> = Vec::new();
    for ch in name.chars().rev() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        tail.push(ch);
    }
    std::iter::once('…').chain(tail.into_iter().rev()).collect()
}

/// Screen regions for one frame
#[derive(Debug, Clone, Copy)]
pub(crate) struct Regions {
    pub header: Option<Rect>,
    pub tabs: Option<Rect>,
    pub banner: Option<Rect>,
    pub content: Rect,
    pub status: Option<Rect>,
}

/// Split the frame into chrome and content. Zen mode keeps only content.
pub(crate) fn regions(app: &App, area: Rect) -> Regions {
    if app.zen_mode {
        return Regions {
            header: None,
            tabs: None,
            banner: None,
            content: area,
            status: None,
        };
    }

    let show_banner = app.session.error().is_some();
    let mut constraints = vec![Constraint::Length(1), Constraint::Length(1)];
    if show_banner {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let (banner, content, status) = if show_banner {
        (Some(chunks[2]), chunks[3], chunks[4])
    } else {
        (None, chunks[2], chunks[3])
    };

    Regions {
        header: Some(chunks[0]),
        tabs: Some(chunks[1]),
        banner,
        content,
        status: Some(status),
    }
}

/// Area the diff body occupies for a frame of size `area`
pub(crate) fn diff_body_area(app: &App, area: Rect) -> Rect {
    diff_layout(regions(app, area).content).body
}

/// Main drawing function
pub fn draw(frame: &mut Frame, app: &mut App) {
    let regions = regions(app, frame.area());

    if let Some(area) = regions.header {
        draw_header(frame, app, area);
    }
    if let Some(area) = regions.tabs {
        draw_tabs(frame, app, area);
    }
    if let Some(area) = regions.banner {
        draw_banner(frame, app, area);
    }

    if app.session.stage() == Stage::Complete {
        match app.active_tab {
            Tab::Summary => render_changelog(frame, app, regions.content),
            Tab::Differences => render_diff_view(frame, app, regions.content),
        }
    } else {
        draw_stage_message(frame, app, regions.content);
    }

    if let Some(area) = regions.status {
        draw_status_bar(frame, app, area);
    }

    if app.show_help {
        draw_help_popover(frame, app);
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = " redline ";
    let available = (area.width as usize).saturating_sub(title.len() + 2);
    let source = shorten_label(&app.source_label, available);

    let line = Line::from(vec![
        Span::styled(
            title,
            Style::default()
                .fg(app.theme.primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(source, Style::default().fg(app.theme.text_muted)),
    ]);
    let mut paragraph = Paragraph::new(line);
    if let Some(bg) = app.theme.background {
        paragraph = paragraph.style(Style::default().bg(bg));
    }
    frame.render_widget(paragraph, area);
}

fn draw_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let selected = match app.active_tab {
        Tab::Summary => 0,
        Tab::Differences => 1,
    };
    let tabs = Tabs::new([Tab::Summary.title(), Tab::Differences.title()])
        .select(selected)
        .style(Style::default().fg(app.theme.text_muted))
        .highlight_style(
            Style::default()
                .fg(app.theme.accent)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .divider(Span::styled("│", Style::default().fg(app.theme.border)));
    frame.render_widget(tabs, area);
}

fn draw_banner(frame: &mut Frame, app: &App, area: Rect) {
    let Some(message) = app.session.error() else {
        return;
    };
    // Failures leave the session in Ready; a completed session only carries warnings
    let color = if app.session.stage() == Stage::Complete {
        app.theme.warning
    } else {
        app.theme.error
    };
    let banner = Paragraph::new(Line::from(vec![
        Span::styled(" ! ", Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::styled(message.to_string(), Style::default().fg(color)),
    ]));
    frame.render_widget(banner, area);
}

fn draw_stage_message(frame: &mut Frame, app: &App, area: Rect) {
    let muted = Style::default().fg(app.theme.text_muted);
    let (title, hint) = match app.session.stage() {
        Stage::Select => ("No comparison loaded", "Press r to compare again or q to quit"),
        Stage::Ready => ("Comparison not available", "Press r to retry or q to quit"),
        Stage::Comparing => ("Comparing documents...", ""),
        Stage::Complete => ("", ""),
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            title,
            Style::default().fg(app.theme.text).add_modifier(Modifier::BOLD),
        )),
    ];
    if !app.reloadable && app.session.stage() != Stage::Comparing {
        lines.push(Line::from(Span::styled("Press q to quit", muted)));
    } else if !hint.is_empty() {
        lines.push(Line::from(Span::styled(hint, muted)));
    }

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let available_width = area.width as usize;
    let muted = Style::default().fg(app.theme.text_muted);

    let mode = match app.active_tab {
        Tab::Summary => " SUMMARY ",
        Tab::Differences => " DIFF ",
    };

    let mut right_spans: Vec<Span> = Vec::new();
    if app.session.stage() == Stage::Complete {
        match app.active_tab {
            Tab::Summary => {
                let total = app.change_count();
                let located = app.resolved_citations().count();
                let position = if total == 0 { 0 } else { app.selected_change + 1 };
                right_spans.push(Span::styled(
                    format!("change {}/{}", position, total),
                    muted,
                ));
                right_spans.push(Span::raw("  "));
                right_spans.push(Span::styled(format!("{} located", located), muted));
            }
            Tab::Differences => {
                let (insertions, deletions) = app.viewport.document().stats();
                let line_count = app.viewport.document().line_count();
                let first = if line_count == 0 {
                    0
                } else {
                    app.viewport.first_visible_index() + 1
                };
                let last = (first + app.viewport.page_lines())
                    .saturating_sub(1)
                    .min(line_count);
                let range = app.viewport.range();

                right_spans.push(Span::styled(
                    format!("+{}", insertions),
                    Style::default().fg(app.theme.diff_added),
                ));
                right_spans.push(Span::raw(" "));
                right_spans.push(Span::styled(
                    format!("-{}", deletions),
                    Style::default().fg(app.theme.diff_removed),
                ));
                right_spans.push(Span::raw("  "));
                right_spans.push(Span::styled(
                    format!("{}-{}/{}", first, last, line_count),
                    muted,
                ));
                right_spans.push(Span::raw("  "));
                right_spans.push(Span::styled(
                    format!("live {}-{}", range.start, range.end),
                    muted,
                ));
            }
        }
    } else {
        right_spans.push(Span::styled(
            format!("{:?}", app.session.stage()).to_lowercase(),
            muted,
        ));
    }
    if let Some(count) = app.pending_count {
        right_spans.insert(0, Span::raw("  "));
        right_spans.insert(0, Span::styled(count.to_string(), Style::default().fg(app.theme.accent)));
    }
    right_spans.push(Span::raw(" "));

    let right_width: usize = right_spans.iter().map(|s| s.width()).sum();
    let left_fixed_width = mode.len() + 1;
    let hint = "? help";
    let hint_max = available_width.saturating_sub(right_width + left_fixed_width + 2);
    let hint = if hint.len() <= hint_max { hint } else { "" };

    let mut spans = vec![
        Span::styled(
            mode,
            Style::default()
                .fg(app.theme.background.unwrap_or(Color::Black))
                .bg(app.theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(hint, muted),
    ];
    let left_width: usize = spans.iter().map(|s| s.width()).sum();
    let pad = available_width.saturating_sub(left_width + right_width);
    spans.push(Span::raw(" ".repeat(pad.max(1))));
    spans.extend(right_spans);

    let mut paragraph = Paragraph::new(Line::from(spans));
    if let Some(bg) = app.theme.background {
        paragraph = paragraph.style(Style::default().bg(bg));
    }
    frame.render_widget(paragraph, area);
}

fn draw_help_popover(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let popup_width = 44u16.min(area.width.saturating_sub(4));
    let popup_height = 24u16.min(area.height.saturating_sub(4));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let key_style = Style::default().fg(app.theme.accent);
    let label_style = Style::default().fg(app.theme.text);
    let section_style = Style::default().fg(app.theme.primary);

    let help_line = |key: &str, desc: &'static str| -> Line {
        Line::from(vec![
            Span::styled(format!("  {:<12}", key), key_style),
            Span::styled(desc, label_style),
        ])
    };

    let lines = vec![
        Line::from(Span::styled(" Tabs", section_style)),
        help_line("Tab", "Switch tab"),
        Line::from(""),
        Line::from(Span::styled(" Summary", section_style)),
        help_line("j / k", "Next/prev change"),
        help_line("gg / G", "First/last change"),
        help_line("Enter", "Jump to cited line"),
        Line::from(""),
        Line::from(Span::styled(" Differences", section_style)),
        help_line("j / k", "Scroll down/up"),
        help_line("^d / ^u", "Half page down/up"),
        help_line("gg / G", "Go to start/end"),
        help_line("h / l", "Scroll left/right"),
        help_line("0", "Scroll to line start"),
        Line::from(""),
        Line::from(Span::styled(" View", section_style)),
        help_line("z", "Zen mode"),
        help_line("s / #", "Scrollbar / line numbers"),
        help_line("r / n", "Reload / new comparison"),
        Line::from(""),
        help_line("?", "Close help"),
        help_line("q / Esc", "Quit"),
    ];

    let mut block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .title_alignment(Alignment::Center)
        .border_style(Style::default().fg(app.theme.accent));
    if let Some(bg) = app.theme.background {
        block = block.style(Style::default().bg(bg));
    }

    let help_block = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left);

    frame.render_widget(help_block, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorten_label() {
        assert_eq!(shorten_label("short.json", 20), "short.json");
        assert_eq!(
            shorten_label("results/2024/contract-v2.json", 24),
            ".../contract-v2.json"
        );
        assert_eq!(shorten_label("a-very-long-name.json", 10), "…name.json");
        assert_eq!(shorten_label("results/2024/contract-v2.json", 8), "…v2.json");
    }
}
