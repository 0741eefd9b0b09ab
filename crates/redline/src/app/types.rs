/// Tabs of the results screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    /// Changelog summary with citation links
    #[default]
    Summary,
    /// Windowed diff view
    Differences,
}

impl Tab {
    /// Switch to the other tab
    pub fn toggle(self) -> Self {
        match self {
            Tab::Summary => Tab::Differences,
            Tab::Differences => Tab::Summary,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Tab::Summary => "Summary & Changes",
            Tab::Differences => "Document Differences",
        }
    }
}

/// Height of one terminal row in viewport units
pub(crate) const ROW_HEIGHT: f64 = 1.0;

/// Lines scrolled per mouse wheel tick
pub(crate) const WHEEL_LINES: isize = 3;

/// Columns scrolled per horizontal step
pub(crate) const HORIZONTAL_STEP: usize = 4;
