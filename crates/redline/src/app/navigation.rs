use super::{App, Tab, HORIZONTAL_STEP, WHEEL_LINES};
use crate::ui;
use ratatui::layout::Rect;
use redline_core::ViewportSignal;
use std::time::Instant;

impl App {
    fn rows_to_height(&self, rows: u16) -> f64 {
        rows as f64 * self.viewport.config().line_height
    }

    /// Rows available to the diff body at the current terminal size
    pub fn diff_body_rows(&self) -> u16 {
        let (cols, rows) = self.terminal_size;
        ui::diff_body_area(self, Rect::new(0, 0, cols, rows)).height
    }

    /// Terminal was resized
    pub fn handle_resize(&mut self, cols: u16, rows: u16) {
        self.terminal_size = (cols, rows);
        self.remeasure();
    }

    /// Re-measure the diff container after a layout change
    pub(crate) fn remeasure(&mut self) {
        if self.active_tab != Tab::Differences {
            return;
        }
        let rows = self.diff_body_rows();
        self.last_viewport_rows = rows;
        self.hub.emit(ViewportSignal::Resized {
            height: self.rows_to_height(rows),
        });
        self.pump_viewport();
    }

    /// Called while drawing with the body size actually laid out
    pub fn observe_diff_area(&mut self, rows: u16) {
        if rows == self.last_viewport_rows && self.viewport.state().viewport_height > 0.0 {
            return;
        }
        self.last_viewport_rows = rows;
        self.hub.emit(ViewportSignal::Resized {
            height: self.rows_to_height(rows),
        });
        self.pump_viewport();
    }

    /// Apply pending measurements. A requested citation line is re-centered
    /// against the new height while the diff tab is showing.
    pub(crate) fn pump_viewport(&mut self) {
        if !self.viewport.pump() {
            return;
        }
        if self.active_tab == Tab::Differences && self.scroll_to_line.is_some() {
            self.viewport.scroll_to_line(self.scroll_to_line, Instant::now());
        }
    }

    /// Show `tab`, signalling visibility changes to the diff viewport
    pub fn set_tab(&mut self, tab: Tab) {
        if self.active_tab == tab {
            return;
        }
        self.active_tab = tab;
        let signal = match tab {
            Tab::Differences => {
                let rows = self.diff_body_rows();
                self.last_viewport_rows = rows;
                ViewportSignal::VisibilityChanged {
                    visible: true,
                    height: self.rows_to_height(rows),
                }
            }
            Tab::Summary => ViewportSignal::VisibilityChanged {
                visible: false,
                height: 0.0,
            },
        };
        self.hub.emit(signal);
        self.pump_viewport();
    }

    pub fn toggle_tab(&mut self) {
        self.set_tab(self.active_tab.toggle());
    }

    /// Jump to a 1-based diff line: switch to the diff tab, then center it
    pub fn open_citation(&mut self, line_number: usize) {
        tracing::debug!(line_number, "citation clicked");
        self.scroll_to_line = Some(line_number);
        self.set_tab(Tab::Differences);
        self.viewport.scroll_to_line(Some(line_number), Instant::now());
    }

    /// Follow the selected change's citation. Returns false if unresolved.
    pub fn follow_selected_citation(&mut self) -> bool {
        match self.session.citation_line(self.selected_change) {
            Some(line) => {
                self.open_citation(line);
                true
            }
            None => false,
        }
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.viewport.scroll_lines(-(lines as isize));
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.viewport.scroll_lines(lines as isize);
    }

    pub fn scroll_half_page_up(&mut self) {
        let half = (self.viewport.page_lines() / 2).max(1);
        self.scroll_up(half);
    }

    pub fn scroll_half_page_down(&mut self) {
        let half = (self.viewport.page_lines() / 2).max(1);
        self.scroll_down(half);
    }

    pub fn wheel_up(&mut self) {
        self.viewport.scroll_lines(-WHEEL_LINES);
    }

    pub fn wheel_down(&mut self) {
        self.viewport.scroll_lines(WHEEL_LINES);
    }

    pub fn goto_start(&mut self) {
        self.viewport.scroll_to(0.0);
    }

    pub fn goto_end(&mut self) {
        let max = self.viewport.max_scroll();
        self.viewport.scroll_to(max);
    }

    pub fn scroll_left(&mut self) {
        self.horizontal_scroll = self.horizontal_scroll.saturating_sub(HORIZONTAL_STEP);
    }

    pub fn scroll_right(&mut self) {
        self.horizontal_scroll += HORIZONTAL_STEP;
    }

    pub fn scroll_to_line_start(&mut self) {
        self.horizontal_scroll = 0;
    }

    /// Clamp horizontal scroll so we don't scroll past the widest line
    pub fn clamp_horizontal_scroll(&mut self, viewport_width: usize) {
        let max_line_width = self.viewport.document().max_line_len();
        let max_scroll = max_line_width.saturating_sub(viewport_width);
        self.horizontal_scroll = self.horizontal_scroll.min(max_scroll);
    }

    /// Advance a pending smooth scroll. Returns true while animating.
    pub fn tick(&mut self) -> bool {
        self.viewport.tick(Instant::now())
    }
}
