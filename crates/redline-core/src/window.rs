//! Windowed rendering of long diffs
//!
//! Only the lines intersecting the viewport (plus a buffer on each side) are
//! handed to the presenter. Each carries its absolute index so it can be
//! placed at `index * line_height` inside a container that reserves
//! `line_count * line_height` for the whole document.

use crate::document::{DiffDocument, LineKind};
use crate::scroll::SmoothScroll;
use crate::signal::{SignalHub, Subscription};
use std::ops::Range;
use std::time::{Duration, Instant};

pub const DEFAULT_LINE_HEIGHT: f64 = 24.0;
pub const DEFAULT_BUFFER_SIZE: usize = 50;

/// Fixed geometry for a windowed view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowConfig {
    /// Uniform height of every line. Must be positive.
    pub line_height: f64,
    /// Lines rendered above and below the visible area
    pub buffer_size: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            line_height: DEFAULT_LINE_HEIGHT,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

/// Scroll position and container height, in the same unit as `line_height`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewportState {
    pub scroll_offset: f64,
    pub viewport_height: f64,
}

/// Half-open `[start, end)` range of line indices to render
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisibleRange {
    pub start: usize,
    pub end: usize,
}

impl VisibleRange {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start..self.end).contains(&index)
    }

    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Compute the range of lines to render for the given viewport.
///
/// `start = max(0, floor(offset / h) - buffer)` and
/// `end = min(count, ceil((offset + height) / h) + buffer)`, with `start`
/// clamped to `end`.
pub fn visible_range(state: ViewportState, line_count: usize, config: WindowConfig) -> VisibleRange {
    let h = config.line_height;
    let first = (state.scroll_offset / h).floor().max(0.0) as usize;
    let last = ((state.scroll_offset + state.viewport_height) / h)
        .ceil()
        .max(0.0) as usize;

    let end = last.saturating_add(config.buffer_size).min(line_count);
    let start = first.saturating_sub(config.buffer_size).min(end);
    VisibleRange { start, end }
}

/// Largest scroll offset that keeps the viewport inside the content
pub fn max_scroll(total_height: f64, viewport_height: f64) -> f64 {
    (total_height - viewport_height).max(0.0)
}

/// Scroll offset that centers 1-based `line_number` in the viewport.
/// Line 0 is treated as line 1.
pub fn centered_offset(line_number: usize, config: WindowConfig, viewport_height: f64) -> f64 {
    let target = line_number.saturating_sub(1) as f64 * config.line_height;
    target - viewport_height / 2.0
}

/// A line in the visible window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderedLine<'a> {
    /// 0-based absolute index into the document
    pub index: usize,
    /// 1-based line number
    pub line_number: usize,
    pub text: &'a str,
    pub kind: LineKind,
    /// Position from the top of the reserved container
    pub offset: f64,
}

/// Renderer instance for one document: owns its viewport state, its
/// measurement subscription and any in-flight smooth scroll.
pub struct DiffViewport {
    document: DiffDocument,
    config: WindowConfig,
    state: ViewportState,
    animation: Option<SmoothScroll>,
    /// Smooth scroll duration; `None` jumps immediately
    smooth_duration: Option<Duration>,
    subscription: Option<Subscription>,
}

impl DiffViewport {
    /// Create a viewport and subscribe to `hub` for measurements
    pub fn new(document: DiffDocument, config: WindowConfig, hub: &SignalHub) -> Self {
        Self {
            document,
            config,
            state: ViewportState::default(),
            animation: None,
            smooth_duration: Some(Duration::from_millis(200)),
            subscription: Some(hub.subscribe()),
        }
    }

    pub fn with_smooth_scroll(mut self, duration: Option<Duration>) -> Self {
        self.smooth_duration = duration;
        self
    }

    pub fn document(&self) -> &DiffDocument {
        &self.document
    }

    pub fn config(&self) -> WindowConfig {
        self.config
    }

    pub fn state(&self) -> ViewportState {
        self.state
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Release the measurement subscription ahead of drop
    pub fn detach(&mut self) {
        self.subscription = None;
    }

    /// Swap in a new document. Scroll returns to the top.
    pub fn set_document(&mut self, document: DiffDocument) {
        self.document = document;
        self.animation = None;
        self.state.scroll_offset = 0.0;
    }

    /// Apply pending resize/visibility signals in arrival order.
    /// Returns true if any were processed.
    pub fn pump(&mut self) -> bool {
        let Some(subscription) = self.subscription.as_ref() else {
            return false;
        };
        let signals = subscription.drain();
        for signal in &signals {
            self.measure(signal.measured_height());
        }
        !signals.is_empty()
    }

    /// Record a new container height
    pub fn measure(&mut self, viewport_height: f64) {
        self.state.viewport_height = viewport_height.max(0.0);
        self.state.scroll_offset = self.state.scroll_offset.min(self.max_scroll());
        tracing::debug!(height = self.state.viewport_height, "viewport measured");
    }

    pub fn total_height(&self) -> f64 {
        self.document.line_count() as f64 * self.config.line_height
    }

    pub fn max_scroll(&self) -> f64 {
        max_scroll(self.total_height(), self.state.viewport_height)
    }

    /// Manual scroll to `offset`, clamped to the content. Supersedes any
    /// pending smooth scroll.
    pub fn scroll_to(&mut self, offset: f64) {
        self.animation = None;
        self.state.scroll_offset = offset.clamp(0.0, self.max_scroll());
    }

    pub fn scroll_by(&mut self, delta: f64) {
        let base = self.state.scroll_offset;
        self.scroll_to(base + delta);
    }

    /// Scroll by whole lines (negative scrolls up)
    pub fn scroll_lines(&mut self, lines: isize) {
        self.scroll_by(lines as f64 * self.config.line_height);
    }

    /// Center 1-based `line_number` in the viewport. `None` is a no-op.
    pub fn scroll_to_line(&mut self, line_number: Option<usize>, now: Instant) {
        let Some(line_number) = line_number else {
            return;
        };
        let target = centered_offset(line_number, self.config, self.state.viewport_height)
            .clamp(0.0, self.max_scroll());
        tracing::debug!(line_number, target, "scroll to line");

        match self.smooth_duration {
            Some(duration) if !duration.is_zero() => {
                self.animation = Some(SmoothScroll::new(
                    self.state.scroll_offset,
                    target,
                    now,
                    duration,
                ));
            }
            _ => {
                self.animation = None;
                self.state.scroll_offset = target;
            }
        }
    }

    /// Pending smooth scroll target, if any
    pub fn scroll_target(&self) -> Option<f64> {
        self.animation.map(|anim| anim.target())
    }

    /// Advance a pending smooth scroll. Returns true while animating.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(anim) = self.animation else {
            return false;
        };
        self.state.scroll_offset = anim.offset_at(now).clamp(0.0, self.max_scroll());
        if anim.is_finished(now) {
            self.animation = None;
            return false;
        }
        true
    }

    pub fn range(&self) -> VisibleRange {
        visible_range(self.state, self.document.line_count(), self.config)
    }

    /// Lines in the current window, tagged with absolute position
    pub fn visible_lines(&self) -> impl Iterator<Item = RenderedLine<'_>> + '_ {
        let range = self.range();
        let line_height = self.config.line_height;
        self.document.lines()[range.as_range()]
            .iter()
            .enumerate()
            .map(move |(i, text)| {
                let index = range.start + i;
                RenderedLine {
                    index,
                    line_number: index + 1,
                    text,
                    kind: LineKind::classify(text),
                    offset: index as f64 * line_height,
                }
            })
    }

    /// First line (0-based) intersecting the viewport, ignoring the buffer
    pub fn first_visible_index(&self) -> usize {
        let idx = (self.state.scroll_offset / self.config.line_height).floor().max(0.0) as usize;
        idx.min(self.document.line_count().saturating_sub(1))
    }

    /// Number of whole lines the viewport can show
    pub fn page_lines(&self) -> usize {
        (self.state.viewport_height / self.config.line_height).floor().max(0.0) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::ViewportSignal;

    fn doc(lines: usize) -> DiffDocument {
        let text = (0..lines)
            .map(|i| match i % 3 {
                0 => format!("+add {i}"),
                1 => format!("-del {i}"),
                _ => format!("ctx {i}"),
            })
            .collect::<Vec<_>>()
            .join("\n");
        DiffDocument::new(&text)
    }

    fn config(line_height: f64, buffer_size: usize) -> WindowConfig {
        WindowConfig {
            line_height,
            buffer_size,
        }
    }

    fn state(scroll_offset: f64, viewport_height: f64) -> ViewportState {
        ViewportState {
            scroll_offset,
            viewport_height,
        }
    }

    #[test]
    fn test_range_at_top() {
        let range = visible_range(state(0.0, 240.0), 1000, config(24.0, 5));
        assert_eq!(range, VisibleRange { start: 0, end: 15 });
    }

    #[test]
    fn test_range_mid_document() {
        let range = visible_range(state(2400.0, 240.0), 1000, config(24.0, 5));
        assert_eq!(range, VisibleRange { start: 95, end: 115 });
    }

    #[test]
    fn test_range_partial_line_rounds_outward() {
        let range = visible_range(state(12.0, 30.0), 1000, config(24.0, 0));
        assert_eq!(range, VisibleRange { start: 0, end: 2 });
    }

    #[test]
    fn test_range_clamped_past_end() {
        let range = visible_range(state(1_000_000.0, 240.0), 100, config(24.0, 5));
        assert_eq!(range, VisibleRange { start: 100, end: 100 });
        assert!(range.is_empty());
    }

    #[test]
    fn test_range_bounds_hold_everywhere() {
        let cfg = config(24.0, 7);
        for count in [0usize, 1, 5, 80, 500] {
            for offset in (0..20_000).step_by(997) {
                for height in [0.0, 1.0, 23.0, 240.0, 5000.0] {
                    let range = visible_range(state(offset as f64, height), count, cfg);
                    assert!(range.start <= range.end);
                    assert!(range.end <= count);
                }
            }
        }
    }

    #[test]
    fn test_range_covers_geometric_view() {
        let cfg = config(24.0, 3);
        let s = state(500.0, 300.0);
        let range = visible_range(s, 1000, cfg);
        let first = (s.scroll_offset / 24.0).floor() as usize;
        let last = ((s.scroll_offset + s.viewport_height) / 24.0).ceil() as usize;
        assert!(range.start <= first);
        assert!(range.end >= last);
    }

    #[test]
    fn test_buffer_is_monotonic_superset() {
        let s = state(1200.0, 480.0);
        let mut previous = visible_range(s, 400, config(24.0, 0));
        for buffer in 1..60 {
            let next = visible_range(s, 400, config(24.0, buffer));
            assert!(next.start <= previous.start);
            assert!(next.end >= previous.end);
            previous = next;
        }
    }

    #[test]
    fn test_range_is_idempotent() {
        let s = state(731.5, 199.0);
        let cfg = config(24.0, 50);
        assert_eq!(visible_range(s, 321, cfg), visible_range(s, 321, cfg));
    }

    #[test]
    fn test_visible_lines_slice_and_offsets() {
        let hub = SignalHub::new();
        let mut viewport = DiffViewport::new(doc(300), config(24.0, 4), &hub);
        viewport.measure(240.0);
        viewport.scroll_to(1000.0);

        let range = viewport.range();
        let lines: Vec<_> = viewport.visible_lines().collect();
        assert_eq!(lines.len(), range.end - range.start);
        for line in &lines {
            assert!(range.contains(line.index));
            assert_eq!(line.line_number, line.index + 1);
            assert_eq!(line.offset, line.index as f64 * 24.0);
            assert!(line.offset >= 0.0 && line.offset < viewport.total_height());
            assert_eq!(line.kind, LineKind::classify(line.text));
        }
    }

    #[test]
    fn test_empty_document() {
        let hub = SignalHub::new();
        let mut viewport = DiffViewport::new(DiffDocument::new(""), WindowConfig::default(), &hub);
        viewport.measure(600.0);
        viewport.scroll_to(300.0);
        assert_eq!(viewport.total_height(), 0.0);
        assert_eq!(viewport.state().scroll_offset, 0.0);
        assert_eq!(viewport.visible_lines().count(), 0);
    }

    #[test]
    fn test_zero_height_before_measurement() {
        let hub = SignalHub::new();
        let viewport = DiffViewport::new(doc(1000), config(24.0, 10), &hub);
        assert_eq!(viewport.range(), VisibleRange { start: 0, end: 10 });
    }

    #[test]
    fn test_pump_applies_signals_in_order() {
        let hub = SignalHub::new();
        let mut viewport = DiffViewport::new(doc(1000), config(24.0, 0), &hub);
        hub.emit(ViewportSignal::Resized { height: 480.0 });
        hub.emit(ViewportSignal::VisibilityChanged {
            visible: false,
            height: 480.0,
        });
        hub.emit(ViewportSignal::VisibilityChanged {
            visible: true,
            height: 240.0,
        });
        assert!(viewport.pump());
        assert_eq!(viewport.state().viewport_height, 240.0);
        assert!(!viewport.pump());
    }

    #[test]
    fn test_drop_releases_listener() {
        let hub = SignalHub::new();
        let mut viewport = DiffViewport::new(doc(10), WindowConfig::default(), &hub);
        assert_eq!(hub.listener_count(), 1);
        viewport.detach();
        assert!(!viewport.is_attached());
        assert_eq!(hub.listener_count(), 0);

        let other = DiffViewport::new(doc(10), WindowConfig::default(), &hub);
        assert_eq!(hub.listener_count(), 1);
        drop(other);
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn test_scroll_to_line_centers_target() {
        let hub = SignalHub::new();
        let mut viewport = DiffViewport::new(doc(1000), config(24.0, 50), &hub)
            .with_smooth_scroll(None);
        viewport.measure(480.0);
        viewport.scroll_to_line(Some(101), Instant::now());
        assert_eq!(viewport.state().scroll_offset, 100.0 * 24.0 - 240.0);
    }

    #[test]
    fn test_scroll_to_line_clamps_to_bounds() {
        let hub = SignalHub::new();
        let mut viewport = DiffViewport::new(doc(100), config(24.0, 50), &hub)
            .with_smooth_scroll(None);
        viewport.measure(480.0);

        viewport.scroll_to_line(Some(2), Instant::now());
        assert_eq!(viewport.state().scroll_offset, 0.0);

        viewport.scroll_to_line(Some(100), Instant::now());
        assert_eq!(viewport.state().scroll_offset, 100.0 * 24.0 - 480.0);
    }

    #[test]
    fn test_scroll_to_line_none_is_noop() {
        let hub = SignalHub::new();
        let mut viewport = DiffViewport::new(doc(100), config(24.0, 50), &hub);
        viewport.measure(480.0);
        viewport.scroll_to(240.0);
        viewport.scroll_to_line(None, Instant::now());
        assert_eq!(viewport.state().scroll_offset, 240.0);
        assert_eq!(viewport.scroll_target(), None);
    }

    #[test]
    fn test_smooth_scroll_reaches_target() {
        let hub = SignalHub::new();
        let mut viewport = DiffViewport::new(doc(1000), config(24.0, 50), &hub)
            .with_smooth_scroll(Some(Duration::from_millis(100)));
        viewport.measure(480.0);
        let start = Instant::now();
        viewport.scroll_to_line(Some(501), start);
        let target = 500.0 * 24.0 - 240.0;
        assert_eq!(viewport.scroll_target(), Some(target));

        assert!(viewport.tick(start + Duration::from_millis(50)));
        let mid = viewport.state().scroll_offset;
        assert!(mid > 0.0 && mid < target);

        assert!(!viewport.tick(start + Duration::from_millis(100)));
        assert_eq!(viewport.state().scroll_offset, target);
        assert_eq!(viewport.scroll_target(), None);
    }

    #[test]
    fn test_last_scroll_request_wins() {
        let hub = SignalHub::new();
        let mut viewport = DiffViewport::new(doc(1000), config(24.0, 50), &hub)
            .with_smooth_scroll(Some(Duration::from_millis(100)));
        viewport.measure(480.0);
        let start = Instant::now();
        viewport.scroll_to_line(Some(800), start);
        viewport.scroll_to_line(Some(300), start);
        assert_eq!(viewport.scroll_target(), Some(299.0 * 24.0 - 240.0));

        viewport.scroll_lines(3);
        assert_eq!(viewport.scroll_target(), None);
        assert!(!viewport.tick(start + Duration::from_secs(1)));
    }

    #[test]
    fn test_set_document_resets_scroll() {
        let hub = SignalHub::new();
        let mut viewport = DiffViewport::new(doc(1000), config(24.0, 50), &hub);
        viewport.measure(480.0);
        viewport.scroll_to(5000.0);
        viewport.set_document(doc(10));
        assert_eq!(viewport.state().scroll_offset, 0.0);
        assert_eq!(viewport.document().line_count(), 10);
    }

}
