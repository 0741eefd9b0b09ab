use super::{html_to_text, slice_columns, wrap_text};
use crate::app::{App, Tab, ROW_HEIGHT};
use crate::ui;
use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
use redline_core::{
    Change, Changelog, ComparisonSession, DocumentComparisonResult, WindowConfig,
};

fn diff_text(lines: usize) -> String {
    (1..=lines)
        .map(|i| match i % 3 {
            0 => format!("+added {i}"),
            1 => format!("-removed {i}"),
            _ => format!(" same {i}"),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn make_result(diff: &str, changes: &[(&str, &str, &str)], warning: bool) -> DocumentComparisonResult {
    DocumentComparisonResult {
        diff_text: diff.to_string(),
        similarity_score: 0.875,
        changelog: Changelog {
            summary: "Payment terms were tightened.".to_string(),
            changes: changes
                .iter()
                .map(|(description, search, context)| Change {
                    description: description.to_string(),
                    search_string: search.to_string(),
                    context: context.to_string(),
                })
                .collect(),
            ..Default::default()
        },
        warning,
    }
}

fn make_app(result: DocumentComparisonResult, width: u16, height: u16) -> App {
    let mut session = ComparisonSession::new();
    session.prepare().unwrap();
    session.begin().unwrap();
    session.complete(result).unwrap();
    let window = WindowConfig {
        line_height: ROW_HEIGHT,
        buffer_size: 2,
    };
    let mut app = App::new(session, window, None, "result.json".to_string());
    app.handle_resize(width, height);
    app
}

fn render_buffer(app: &mut App, width: u16, height: u16) -> Buffer {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).expect("terminal");
    terminal.draw(|frame| ui::draw(frame, app)).expect("draw");
    terminal.backend().buffer().clone()
}

fn buffer_text(buf: &Buffer) -> Vec<String> {
    let mut lines = Vec::new();
    for y in 0..buf.area.height {
        let mut line = String::new();
        for x in 0..buf.area.width {
            line.push_str(buf[(x, y)].symbol());
        }
        lines.push(line);
    }
    lines
}

#[test]
fn test_diff_view_renders_window_only() {
    let mut app = make_app(make_result(&diff_text(1000), &[], false), 80, 20);
    app.set_tab(Tab::Differences);

    let text = buffer_text(&render_buffer(&mut app, 80, 20)).join("\n");
    assert!(text.contains("Similarity Score: 87.50%"));
    assert!(text.contains("added 15"));
    assert!(!text.contains("same 17"));

    // 20 rows - header, tabs, status, score = 16 body rows, plus 2 buffered
    assert_eq!(app.viewport.state().viewport_height, 16.0);
    let range = app.viewport.range();
    assert_eq!((range.start, range.end), (0, 18));
}

#[test]
fn test_gutter_shows_line_numbers() {
    let mut app = make_app(make_result(&diff_text(30), &[], false), 80, 20);
    app.set_tab(Tab::Differences);

    let lines = buffer_text(&render_buffer(&mut app, 80, 20));
    assert!(lines.iter().any(|l| l.contains("  1 │-removed 1")));
    assert!(lines.iter().any(|l| l.contains("  3 │+added 3")));

    app.toggle_line_numbers();
    let lines = buffer_text(&render_buffer(&mut app, 80, 20));
    assert!(lines.iter().any(|l| l.starts_with("-removed 1 ")));
    assert!(!lines.iter().any(|l| l.contains("│-removed 1")));
}

#[test]
fn test_scrolling_moves_window() {
    let mut app = make_app(make_result(&diff_text(1000), &[], false), 80, 20);
    app.set_tab(Tab::Differences);
    render_buffer(&mut app, 80, 20);

    app.scroll_down(100);
    let text = buffer_text(&render_buffer(&mut app, 80, 20)).join("\n");
    assert!(text.contains("same 101"));
    assert!(!text.contains("same 98"));
    assert_eq!(app.viewport.range().start, 98);

    app.goto_end();
    let text = buffer_text(&render_buffer(&mut app, 80, 20)).join("\n");
    assert!(text.contains("removed 1000"));
}

#[test]
fn test_citation_jump_centers_line() {
    let result = make_result(
        &diff_text(1000),
        &[
            ("Deadline moved", "added 501", "<p>Net <b>30</b> days</p>"),
            ("Unlocated", "nowhere to be found", ""),
        ],
        false,
    );
    let mut app = make_app(result, 80, 20);

    let summary = buffer_text(&render_buffer(&mut app, 80, 20)).join("\n");
    assert!(summary.contains("Detailed Changes (2)"));
    assert!(summary.contains("↗ Line 501"));
    assert!(summary.contains("Net 30 days"));
    assert!(!summary.contains("<b>"));
    assert_eq!(summary.matches("↗ Line").count(), 1);

    assert!(app.follow_selected_citation());
    assert_eq!(app.active_tab, Tab::Differences);

    let lines = buffer_text(&render_buffer(&mut app, 80, 20));
    // 16 body rows: line 501 sits at offset 500, centered gives 492
    assert_eq!(app.viewport.state().scroll_offset, 492.0);
    let cited = lines
        .iter()
        .find(|l| l.contains("+added 501"))
        .expect("cited line rendered");
    assert!(cited.contains("▶"));
    assert!(!lines.join("\n").contains("same 491"));

    app.select_next_change(1);
    app.set_tab(Tab::Summary);
    assert!(!app.follow_selected_citation());
    assert_eq!(app.active_tab, Tab::Summary);
}

#[test]
fn test_warning_banner_takes_a_row() {
    let mut app = make_app(make_result(&diff_text(100), &[], true), 80, 20);
    app.set_tab(Tab::Differences);

    let text = buffer_text(&render_buffer(&mut app, 80, 20)).join("\n");
    assert!(text.contains("Documents appear to be significantly different"));
    assert_eq!(app.viewport.state().viewport_height, 15.0);
}

#[test]
fn test_zen_mode_hides_chrome() {
    let mut app = make_app(make_result(&diff_text(100), &[], false), 80, 20);
    app.set_tab(Tab::Differences);
    app.toggle_zen();

    let text = buffer_text(&render_buffer(&mut app, 80, 20)).join("\n");
    assert!(!text.contains("Summary & Changes"));
    assert!(!text.contains(" DIFF "));
    assert_eq!(app.viewport.state().viewport_height, 19.0);
}

#[test]
fn test_empty_diff_and_failed_reload() {
    let mut app = make_app(make_result("", &[], false), 80, 20);
    app.set_tab(Tab::Differences);
    let text = buffer_text(&render_buffer(&mut app, 80, 20)).join("\n");
    assert!(text.contains("No differences to show"));

    app.reloadable = true;
    app.reload(|| anyhow::bail!("service unavailable"));
    let text = buffer_text(&render_buffer(&mut app, 80, 20)).join("\n");
    assert!(text.contains("service unavailable"));
    assert!(text.contains("Comparison not available"));
    assert!(text.contains("Press r to retry"));
}

#[test]
fn test_help_popover_renders() {
    let mut app = make_app(make_result(&diff_text(10), &[], false), 80, 30);
    app.toggle_help();
    let text = buffer_text(&render_buffer(&mut app, 80, 30)).join("\n");
    assert!(text.contains("Help"));
    assert!(text.contains("Jump to cited line"));
}

#[test]
fn test_html_to_text() {
    assert_eq!(
        html_to_text("<p>Fees &amp; <em>penalties</em></p><p>apply</p>"),
        "Fees & penalties\napply"
    );
    assert_eq!(html_to_text("a<br/>b"), "a\nb");
    assert_eq!(html_to_text("plain"), "plain");
}

#[test]
fn test_wrap_text() {
    assert_eq!(
        wrap_text("the quick brown fox", 10),
        vec!["the quick", "brown fox"]
    );
    assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    assert!(wrap_text("", 10).is_empty());
}

#[test]
fn test_slice_columns() {
    assert_eq!(slice_columns("hello world", 6, 5), "world");
    assert_eq!(slice_columns("short", 10, 5), "");
    // Wide characters never straddle the edge
    assert_eq!(slice_columns("日本語", 1, 4), "本");
}
