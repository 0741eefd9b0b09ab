//! Application state and logic

use crate::config::ResolvedTheme;
use redline_core::{
    ComparisonSession, DiffViewport, DocumentComparisonResult, SignalHub, WindowConfig,
};
use std::time::Duration;

mod changes;
mod navigation;
mod types;

pub use types::Tab;
pub(crate) use types::{HORIZONTAL_STEP, ROW_HEIGHT, WHEEL_LINES};

/// The main application state
pub struct App {
    /// Comparison lifecycle and derived document/citations
    pub session: ComparisonSession,
    /// Windowed renderer for the diff tab
    pub viewport: DiffViewport,
    /// Resize/visibility signal source for the viewport
    hub: SignalHub,
    /// Currently shown tab
    pub active_tab: Tab,
    /// Selected change in the changelog list
    pub selected_change: usize,
    /// Last citation requested for the diff view; re-applied when the
    /// viewport is re-measured
    pub scroll_to_line: Option<usize>,
    /// Horizontal scroll offset (for long lines)
    pub horizontal_scroll: usize,
    /// Whether to quit
    pub should_quit: bool,
    /// Zen mode - hide UI chrome (header, tabs, status bar)
    pub zen_mode: bool,
    /// Show scrollbar in the diff view
    pub scrollbar_visible: bool,
    /// Show the line number gutter
    pub line_numbers: bool,
    /// Whether to show the help popover
    pub show_help: bool,
    /// Resolved theme colors
    pub theme: ResolvedTheme,
    /// Where the comparison result came from (path or "stdin")
    pub source_label: String,
    /// Whether `r` can re-read the source
    pub reloadable: bool,
    /// Terminal size (cols, rows) last reported
    pub(crate) terminal_size: (u16, u16),
    /// Diff body rows at the last measurement
    pub last_viewport_rows: u16,
    /// Pending count for vim-style commands (e.g., 10j)
    pub pending_count: Option<usize>,
    /// Pending "g" prefix for gg
    pub pending_g_prefix: bool,
}

impl App {
    pub fn new(
        session: ComparisonSession,
        window: WindowConfig,
        smooth_scroll: Option<Duration>,
        source_label: String,
    ) -> Self {
        let hub = SignalHub::new();
        let viewport = DiffViewport::new(session.document().clone(), window, &hub)
            .with_smooth_scroll(smooth_scroll);
        Self {
            session,
            viewport,
            hub,
            active_tab: Tab::Summary,
            selected_change: 0,
            scroll_to_line: None,
            horizontal_scroll: 0,
            should_quit: false,
            zen_mode: false,
            scrollbar_visible: true,
            line_numbers: true,
            show_help: false,
            theme: ResolvedTheme::default(),
            source_label,
            reloadable: false,
            terminal_size: (80, 24),
            last_viewport_rows: 0,
            pending_count: None,
            pending_g_prefix: false,
        }
    }

    /// Active comparison result, if the session is complete
    pub fn result(&self) -> Option<&DocumentComparisonResult> {
        self.session.result()
    }

    /// Add a digit to the pending count (vim-style command counts)
    pub fn push_count_digit(&mut self, digit: u8) {
        let current = self.pending_count.unwrap_or(0);
        let new_count = current.saturating_mul(10).saturating_add(digit as usize);
        self.pending_count = Some(new_count.min(9999));
    }

    /// Get the pending count (defaults to 1) and reset it
    pub fn take_count(&mut self) -> usize {
        self.pending_count.take().unwrap_or(1)
    }

    /// Reset pending count without using it
    pub fn reset_count(&mut self) {
        self.pending_count = None;
        self.pending_g_prefix = false;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn toggle_zen(&mut self) {
        self.zen_mode = !self.zen_mode;
        self.remeasure();
    }

    pub fn toggle_scrollbar(&mut self) {
        self.scrollbar_visible = !self.scrollbar_visible;
    }

    pub fn toggle_line_numbers(&mut self) {
        self.line_numbers = !self.line_numbers;
    }

    /// Drop the current result and return to input selection
    pub fn start_new(&mut self) {
        self.session.start_new();
        self.viewport.set_document(self.session.document().clone());
        self.selected_change = 0;
        self.scroll_to_line = None;
        self.horizontal_scroll = 0;
    }

    /// Replace the active result by running the comparison again.
    /// On failure the session falls back to ready and keeps the message.
    pub fn reload<F>(&mut self, load: F)
    where
        F: FnOnce() -> anyhow::Result<DocumentComparisonResult>,
    {
        self.start_new();

        if self.session.prepare().is_err() || self.session.begin().is_err() {
            return;
        }
        match load() {
            Ok(result) => {
                if self.session.complete(result).is_ok() {
                    self.viewport.set_document(self.session.document().clone());
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "reload failed");
                let _ = self.session.fail(format!("{err:#}"));
            }
        }
        self.remeasure();
    }
}
