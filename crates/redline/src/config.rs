//! User settings from `redline/config.toml` under `$XDG_CONFIG_HOME`,
//! `~/.config` or the platform config dir. CLI flags override them.
//!
//! ```toml
//! [viewer]
//! buffer_size = 50
//! smooth_scroll = true
//! scroll_duration = 200
//! scrollbar = true
//! line_numbers = true
//!
//! [ui]
//! zen = false
//! tab = "summary"
//!
//! [ui.theme]
//! mode = "dark"
//!
//! [ui.theme.defs]
//! green1 = "#A3BE8C"
//!
//! [ui.theme.colors]
//! diff_added = "green1"
//! diff_removed = "#BF616A"
//! ```

use crate::app::Tab;
use crate::color;
use ratatui::style::Color;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Color tokens; each value is a def name, hex string or ANSI name
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ThemeColors {
    pub text: Option<String>,
    pub text_muted: Option<String>,
    pub primary: Option<String>,
    pub accent: Option<String>,
    pub error: Option<String>,
    pub warning: Option<String>,
    pub success: Option<String>,
    pub border: Option<String>,
    pub background: Option<String>,
    pub diff_added: Option<String>,
    pub diff_removed: Option<String>,
    pub diff_context: Option<String>,
    pub diff_line_number: Option<String>,
}

/// Theme configuration (mode + defs + tokens)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// "dark" (default) or "light"
    pub mode: Option<String>,
    /// Named colors that tokens can refer to
    pub defs: HashMap<String, String>,
    pub colors: ThemeColors,
}

impl ThemeConfig {
    pub fn is_light_mode(&self) -> bool {
        matches!(self.mode.as_deref(), Some(mode) if mode.eq_ignore_ascii_case("light"))
    }

    /// Concrete colors for drawing; unset or invalid tokens use the
    /// terminal palette
    pub fn resolve(&self, light_mode: bool) -> ResolvedTheme {
        let defs = &self.defs;
        let tokens = &self.colors;
        let resolve = |token: &Option<String>, fallback: Color| match token.as_deref() {
            Some(value) => color::resolve_color(value, defs).unwrap_or(fallback),
            None => fallback,
        };

        // Grays and yellow are unreadable on light backgrounds
        let muted = if light_mode { Color::Gray } else { Color::DarkGray };
        let warning_fallback = if light_mode { Color::Magenta } else { Color::Yellow };

        ResolvedTheme {
            text: resolve(&tokens.text, Color::Reset),
            text_muted: resolve(&tokens.text_muted, muted),
            primary: resolve(&tokens.primary, Color::Blue),
            accent: resolve(&tokens.accent, Color::Cyan),
            error: resolve(&tokens.error, Color::LightRed),
            warning: resolve(&tokens.warning, warning_fallback),
            success: resolve(&tokens.success, Color::LightGreen),
            border: resolve(&tokens.border, muted),
            background: tokens
                .background
                .as_deref()
                .filter(|v| !matches!(v.trim().to_lowercase().as_str(), "transparent" | "none"))
                .and_then(|v| color::resolve_color(v, defs)),
            diff_added: resolve(&tokens.diff_added, Color::Green),
            diff_removed: resolve(&tokens.diff_removed, Color::Red),
            diff_context: resolve(&tokens.diff_context, Color::Reset),
            diff_line_number: resolve(&tokens.diff_line_number, muted),
        }
    }
}

/// Theme with every token resolved
#[derive(Debug, Clone)]
pub struct ResolvedTheme {
    pub text: Color,
    pub text_muted: Color,
    pub primary: Color,
    pub accent: Color,
    pub error: Color,
    pub warning: Color,
    pub success: Color,
    pub border: Color,
    /// None = transparent
    pub background: Option<Color>,
    pub diff_added: Color,
    pub diff_removed: Color,
    pub diff_context: Color,
    pub diff_line_number: Color,
}

impl ResolvedTheme {
    pub fn added_dim(&self) -> Color {
        color::dim_color(self.diff_added)
    }

    pub fn removed_dim(&self) -> Color {
        color::dim_color(self.diff_removed)
    }
}

impl Default for ResolvedTheme {
    fn default() -> Self {
        ThemeConfig::default().resolve(false)
    }
}

/// Diff viewer settings
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Lines kept live above and below the visible rows
    pub buffer_size: usize,
    /// Animate jumps to citations
    pub smooth_scroll: bool,
    /// Smooth scroll duration in milliseconds
    pub scroll_duration: u64,
    pub scrollbar: bool,
    pub line_numbers: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            buffer_size: redline_core::window::DEFAULT_BUFFER_SIZE,
            smooth_scroll: true,
            scroll_duration: 200,
            scrollbar: true,
            line_numbers: true,
        }
    }
}

impl ViewerConfig {
    /// Smooth scroll duration, or None for instant jumps
    pub fn smooth_duration(&self) -> Option<Duration> {
        (self.smooth_scroll && self.scroll_duration > 0)
            .then(|| Duration::from_millis(self.scroll_duration))
    }
}

/// UI settings
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct UiConfig {
    /// Hide header, tabs and status bar
    pub zen: bool,
    /// Initial tab: "summary" or "differences"
    pub tab: Option<String>,
    pub theme: ThemeConfig,
}

/// Root configuration
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub viewer: ViewerConfig,
    pub ui: UiConfig,
}

impl Config {
    /// Candidate config files, most specific first
    fn candidate_paths() -> Vec<PathBuf> {
        let xdg = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from);
        let home = dirs::home_dir().map(|home| home.join(".config"));
        // ~/Library/Application Support on macOS
        let platform = dirs::config_dir();

        let mut paths: Vec<PathBuf> = Vec::with_capacity(3);
        for dir in [xdg, home, platform].into_iter().flatten() {
            let path = dir.join("redline").join("config.toml");
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
        paths
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::candidate_paths().into_iter().find(|path| path.is_file())
    }

    /// Read the first config file found. Missing or unreadable files give
    /// the defaults.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::parse(&content)
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "cannot read config");
                Self::default()
            }
        }
    }

    fn parse(content: &str) -> Self {
        match toml::from_str(content) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Warning: Failed to parse config: {}", err);
                tracing::warn!(error = %err, "failed to parse config");
                Self::default()
            }
        }
    }

    /// Parse initial tab string to Tab
    pub fn parse_tab(&self) -> Option<Tab> {
        self.ui.tab.as_deref().and_then(|s| match s {
            "summary" | "changes" => Some(Tab::Summary),
            "differences" | "diff" => Some(Tab::Differences),
            _ => None,
        })
    }
}
