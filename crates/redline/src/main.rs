//! Redline CLI - document diff viewer with changelog citations

mod app;
mod color;
mod config;
mod ui;
mod views;

use anyhow::{Context, Result};
use app::{App, Tab, ROW_HEIGHT};
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use redline_core::{ComparisonSession, DocumentComparisonResult, WindowConfig};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "redline")]
#[command(author, version, about = "A windowed document diff viewer with changelog citations")]
struct Args {
    /// Comparison result JSON file, or "-" to read stdin
    #[arg(value_name = "RESULT")]
    input: PathBuf,

    /// Lines rendered above and below the visible area
    #[arg(short, long)]
    buffer_size: Option<usize>,

    /// Jump to citations without animating
    #[arg(long)]
    no_smooth: bool,

    /// Theme mode: dark or light
    #[arg(long, value_enum)]
    theme_mode: Option<CliThemeMode>,

    /// Tab to open on start
    #[arg(short, long, value_enum)]
    tab: Option<CliTab>,

    /// Open the diff centered on this 1-based line
    #[arg(short, long, value_name = "N")]
    line: Option<usize>,

    /// Path to log file for diagnostics
    #[arg(long, value_name = "PATH", default_value_os_t = default_log_path())]
    log_file: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum CliThemeMode {
    Dark,
    Light,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum CliTab {
    /// Changelog summary and change list
    #[value(alias = "changes")]
    Summary,
    /// Windowed diff view
    #[value(alias = "diff")]
    Differences,
}

impl From<CliTab> for Tab {
    fn from(tab: CliTab) -> Self {
        match tab {
            CliTab::Summary => Tab::Summary,
            CliTab::Differences => Tab::Differences,
        }
    }
}

fn default_log_path() -> PathBuf {
    std::env::temp_dir().join("redline.log")
}

/// Where the comparison result is read from
enum Source {
    File(PathBuf),
    /// Stdin can only be read once, so its text is kept
    Stdin(String),
}

impl Source {
    fn from_arg(input: PathBuf) -> Result<Self> {
        if input.as_os_str() == "-" {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read comparison result from stdin")?;
            Ok(Source::Stdin(text))
        } else {
            Ok(Source::File(input))
        }
    }

    fn label(&self) -> String {
        match self {
            Source::File(path) => path.display().to_string(),
            Source::Stdin(_) => "stdin".to_string(),
        }
    }

    fn is_reloadable(&self) -> bool {
        matches!(self, Source::File(_))
    }

    fn load(&self) -> Result<DocumentComparisonResult> {
        let text = match self {
            Source::File(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read: {}", path.display()))?,
            Source::Stdin(text) => text.clone(),
        };
        let result = DocumentComparisonResult::from_json(&text)
            .with_context(|| format!("Failed to load comparison from {}", self.label()))?;
        Ok(result)
    }
}

fn init_logging(path: &Path) {
    if let Ok(log_file) = std::fs::File::create(path) {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::sync::Arc::new(log_file)).with_ansi(false))
            .with(EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()))
            .init();
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_file);
    let config = config::Config::load();

    let source = Source::from_arg(args.input.clone())?;
    tracing::info!(source = %source.label(), "starting");

    let mut session = ComparisonSession::new();
    session.prepare()?;
    session.begin()?;
    match source.load() {
        Ok(result) => session.complete(result)?,
        Err(err) => {
            session.fail(format!("{err:#}"))?;
            return Err(err);
        }
    }

    let window = WindowConfig {
        line_height: ROW_HEIGHT,
        buffer_size: args.buffer_size.unwrap_or(config.viewer.buffer_size),
    };
    let smooth_scroll = if args.no_smooth {
        None
    } else {
        config.viewer.smooth_duration()
    };

    let mut app = App::new(session, window, smooth_scroll, source.label());
    app.reloadable = source.is_reloadable();
    app.zen_mode = config.ui.zen;
    app.scrollbar_visible = config.viewer.scrollbar;
    app.line_numbers = config.viewer.line_numbers;

    // CLI overrides config, default to dark
    let light_mode = match args.theme_mode {
        Some(CliThemeMode::Light) => true,
        Some(CliThemeMode::Dark) => false,
        None => config.ui.theme.is_light_mode(),
    };
    app.theme = config.ui.theme.resolve(light_mode);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (cols, rows) = crossterm::terminal::size()?;
    app.handle_resize(cols, rows);

    let initial_tab = args
        .tab
        .map(Tab::from)
        .or_else(|| config.parse_tab())
        .unwrap_or_default();
    app.set_tab(initial_tab);
    if let Some(line) = args.line {
        app.open_citation(line);
    }

    let result = run_app(&mut terminal, &mut app, &source);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        return Err(err);
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, source: &Source) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let tick_rate = Duration::from_millis(16);

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Resize(cols, rows) => {
                    app.handle_resize(cols, rows);
                }
                Event::Mouse(me) => {
                    if app.show_help {
                        continue;
                    }
                    app.reset_count();
                    match (me.kind, app.active_tab) {
                        (MouseEventKind::ScrollUp, Tab::Differences) => app.wheel_up(),
                        (MouseEventKind::ScrollDown, Tab::Differences) => app.wheel_down(),
                        (MouseEventKind::ScrollUp, Tab::Summary) => app.select_prev_change(1),
                        (MouseEventKind::ScrollDown, Tab::Summary) => app.select_next_change(1),
                        _ => {}
                    }
                }
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key(app, key.code, key.modifiers, source);
                }
                _ => {}
            }
        }

        app.tick();

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers, source: &Source) {
    let g_prefix = std::mem::take(&mut app.pending_g_prefix);
    let on_diff = app.active_tab == Tab::Differences;

    match code {
        // Digit keys for vim-style counts (e.g., 10j)
        KeyCode::Char(c @ '0'..='9') => {
            if c == '0' && app.pending_count.is_none() {
                app.scroll_to_line_start();
            } else {
                app.push_count_digit(c as u8 - b'0');
            }
        }
        KeyCode::Char('q') | KeyCode::Esc => {
            app.reset_count();
            if app.show_help {
                app.show_help = false;
            } else {
                app.should_quit = true;
            }
        }
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        KeyCode::Tab | KeyCode::BackTab => {
            app.reset_count();
            app.toggle_tab();
        }
        KeyCode::Down | KeyCode::Char('j') => {
            let count = app.take_count();
            if on_diff {
                app.scroll_down(count);
            } else {
                app.select_next_change(count);
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            let count = app.take_count();
            if on_diff {
                app.scroll_up(count);
            } else {
                app.select_prev_change(count);
            }
        }
        KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.reset_count();
            if on_diff {
                app.scroll_half_page_down();
            }
        }
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.reset_count();
            if on_diff {
                app.scroll_half_page_up();
            }
        }
        KeyCode::PageDown => {
            app.reset_count();
            if on_diff {
                app.scroll_half_page_down();
            }
        }
        KeyCode::PageUp => {
            app.reset_count();
            if on_diff {
                app.scroll_half_page_up();
            }
        }
        KeyCode::Left | KeyCode::Char('h') => {
            let count = app.take_count();
            for _ in 0..count {
                app.scroll_left();
            }
        }
        KeyCode::Right | KeyCode::Char('l') => {
            let count = app.take_count();
            for _ in 0..count {
                app.scroll_right();
            }
        }
        KeyCode::Char('g') => {
            app.reset_count();
            if g_prefix {
                if on_diff {
                    app.goto_start();
                } else {
                    app.select_first_change();
                }
            } else {
                app.pending_g_prefix = true;
            }
        }
        KeyCode::Home => {
            app.reset_count();
            if on_diff {
                app.goto_start();
            } else {
                app.select_first_change();
            }
        }
        KeyCode::End | KeyCode::Char('G') => {
            app.reset_count();
            if on_diff {
                app.goto_end();
            } else {
                app.select_last_change();
            }
        }
        KeyCode::Enter => {
            app.reset_count();
            if !on_diff && !app.follow_selected_citation() {
                tracing::debug!(change = app.selected_change, "no citation for change");
            }
        }
        KeyCode::Char('z') => {
            app.reset_count();
            app.toggle_zen();
        }
        KeyCode::Char('s') => {
            app.reset_count();
            app.toggle_scrollbar();
        }
        KeyCode::Char('#') => {
            app.reset_count();
            app.toggle_line_numbers();
        }
        KeyCode::Char('r') => {
            app.reset_count();
            if app.reloadable {
                app.reload(|| source.load());
            }
        }
        KeyCode::Char('n') => {
            app.reset_count();
            app.start_new();
        }
        KeyCode::Char('?') => {
            app.reset_count();
            app.toggle_help();
        }
        _ => {
            app.reset_count();
        }
    }
}
