use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, Show},
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute as crossterm_execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame, Terminal,
};
use std::io;
use std::panic;
use std::path::{Path, PathBuf};
use std::time::Instant;
#[cfg(unix)]
use std::{os::raw::c_int, thread};

#[cfg(unix)]
use signal_hook::{
    consts::{SIGHUP, SIGINT, SIGTERM},
    iterator::{Handle, Signals},
};

use crate::dispatch::{HitMap, HitRegion, Mode, HELP_ITEMS};
use crate::listing::{FsListing, Listing, ListingProvider};
use crate::navigator::Navigator;

/// Rows of the entry table taken by the column header.
const HEADER_ROWS: u16 = 1;

/// How entries and the current path are drawn. Fixed for the whole run.
#[derive(Debug, Clone)]
pub struct ViewOptions {
    cursor: String,
    blank: String,
    relative_to: Option<PathBuf>,
}

impl ViewOptions {
    pub fn new(cursor: &str, relative_to: Option<PathBuf>) -> Self {
        let cursor = cursor.trim().to_string();
        let blank = " ".repeat(cursor.chars().count());
        Self {
            cursor,
            blank,
            relative_to,
        }
    }

    fn display_path(&self, path: &Path) -> String {
        match &self.relative_to {
            Some(base) => match pathdiff::diff_paths(path, base) {
                Some(rel) if rel.as_os_str().is_empty() => String::from("."),
                Some(rel) => rel.display().to_string(),
                None => path.display().to_string(),
            },
            None => path.display().to_string(),
        }
    }

    fn row_text(&self, label: &str, selected: bool) -> String {
        let prefix = if selected { &self.cursor } else { &self.blank };
        format!("{prefix} {label}")
    }
}

/// Leave raw mode and the alternate screen. Safe to call more than once.
fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = crossterm_execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen, Show);
}

/// Run `restore` before the current panic hook prints its report, so the
/// message lands on the normal screen.
fn chain_panic_hook(restore: fn()) {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        restore();
        previous(info);
    }));
}

/// Call `on_signal` from a watcher thread when one of `signals` arrives.
#[cfg(unix)]
fn watch_signals(
    signals: &[c_int],
    on_signal: impl FnOnce(c_int) + Send + 'static,
) -> io::Result<Handle> {
    let mut signals = Signals::new(signals)?;
    let handle = signals.handle();
    thread::spawn(move || {
        if let Some(signal) = signals.forever().next() {
            on_signal(signal);
        }
    });
    Ok(handle)
}

/// Raw mode, alternate screen and mouse capture for as long as it lives.
///
/// Dropping it restores the terminal, including when unwinding from a panic.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let guard = TerminalGuard;
        chain_panic_hook(restore_terminal);
        crossterm_execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture, Hide)
            .context("Failed to set up terminal")?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_terminal();
    }
}

pub fn run_tui(navigator: &mut Navigator, view: &ViewOptions) -> Result<()> {
    let _guard = TerminalGuard::enter()?;
    // kill -INT/-TERM/-HUP never unwind, so restore from the watcher and exit
    #[cfg(unix)]
    let signals = watch_signals(&[SIGINT, SIGTERM, SIGHUP], |signal| {
        restore_terminal();
        log::warn!("terminated by signal {signal}");
        std::process::exit(128 + signal);
    })
    .context("Failed to install signal handlers")?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    let result = run_loop(&mut terminal, navigator, &FsListing, view, event::read);

    #[cfg(unix)]
    signals.close();
    result
}

/// Draw, block for one event, dispatch it; until the navigator quits.
pub fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    navigator: &mut Navigator,
    provider: &dyn ListingProvider,
    view: &ViewOptions,
    mut next_event: impl FnMut() -> io::Result<Event>,
) -> Result<()> {
    while !navigator.is_terminated() {
        let mut shown = None;
        terminal.draw(|f| shown = Some(draw(f, navigator, provider, view)))?;
        let listing = shown.unwrap_or_else(Listing::marker_only);

        let event = next_event().context("Failed to read terminal event")?;
        navigator.handle_event(&event, &listing, provider, Instant::now());
    }
    log::info!(
        "leaving {} at depth {}",
        navigator.current_path().display(),
        navigator.context().depth()
    );
    Ok(())
}

fn draw(
    f: &mut Frame,
    navigator: &mut Navigator,
    provider: &dyn ListingProvider,
    view: &ViewOptions,
) -> Listing {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(f.size());

    let files_title = Span::styled(
        "Files",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    );
    let table_block = Block::default().borders(Borders::ALL).title(files_title);
    let inner = table_block.inner(chunks[1]);
    let height = inner.height.saturating_sub(HEADER_ROWS) as usize;

    let listing = navigator.refresh(provider, height);

    // Current path (top bar)
    let current_dir_title = Span::styled(
        "Current Directory",
        Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
    );
    let path_widget = Paragraph::new(view.display_path(navigator.current_path()))
        .block(Block::default().borders(Borders::ALL).title(current_dir_title))
        .wrap(Wrap { trim: true });

    // Entry table, one row per visible entry
    let viewport = *navigator.viewport();
    let window = viewport.window(listing.len());
    let name_width = inner.width / 2;
    let mut hits = HitMap::default();
    let mut rows = Vec::with_capacity(window.len());
    for (i, entry) in listing.entries()[window.clone()].iter().enumerate() {
        let selected = window.start + i == viewport.cursor();
        let text = view.row_text(&entry.label(), selected);
        let width = Span::raw(text.as_str()).width() as u16;
        hits.push(HitRegion {
            row: inner.y + HEADER_ROWS + i as u16,
            columns: inner.x..inner.x + width.min(name_width),
            name: entry.name.clone(),
            kind: entry.kind,
        });

        let mut style = Style::default();
        if entry.is_dir_like() {
            style = style.fg(Color::Blue);
        }
        if selected {
            style = style.fg(Color::Yellow).add_modifier(Modifier::REVERSED);
        }
        rows.push(
            Row::new(vec![
                Cell::from(text),
                Cell::from(entry.size.clone().unwrap_or_default()),
                Cell::from(entry.modified.clone().unwrap_or_default()),
            ])
            .style(style),
        );
    }
    navigator.publish_hits(hits);

    let header = Row::new(vec!["File Name", "File Size", "Last Modified"])
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(50),
            Constraint::Length(10),
            Constraint::Min(20),
        ],
    )
    .header(header)
    .block(table_block);

    // Footer: notice if any, otherwise the help hint
    let footer_line = match navigator.notice() {
        Some(notice) => Line::from(Span::styled(
            notice.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        None => Line::from(vec![
            Span::styled("?", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled(": ", Style::default().fg(Color::White)),
            Span::styled("Help", Style::default().fg(Color::Green)),
            Span::raw("  "),
            Span::styled("q/Esc", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled(": ", Style::default().fg(Color::White)),
            Span::styled("Exit", Style::default().fg(Color::Green)),
        ]),
    };
    let footer_widget = Paragraph::new(footer_line)
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: true });

    f.render_widget(path_widget, chunks[0]);
    f.render_widget(table, chunks[1]);
    f.render_widget(footer_widget, chunks[2]);

    if navigator.mode() == Mode::HelpOverlay {
        draw_help(f);
    }

    listing
}

fn draw_help(f: &mut Frame) {
    let area = centered_rect(60, 50, f.size());
    let key_width = HELP_ITEMS.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0) + 2;

    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("{:<key_width$}", "KEY"),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled("ACTION", Style::default().add_modifier(Modifier::BOLD)),
    ])];
    for (key, desc) in HELP_ITEMS {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{key:<key_width$}"),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(desc, Style::default().fg(Color::Green)),
        ]));
    }

    let help_title = Span::styled(
        "Help (Esc to close)",
        Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
    );
    let help = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(help_title))
        .style(Style::default().fg(Color::White).bg(Color::Blue));

    f.render_widget(Clear, area);
    f.render_widget(help, area);
}

fn centered_rect(width_percent: u16, height_percent: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - height_percent) / 2),
            Constraint::Percentage(height_percent),
            Constraint::Percentage((100 - height_percent) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - width_percent) / 2),
            Constraint::Percentage(width_percent),
            Constraint::Percentage((100 - width_percent) / 2),
        ])
        .split(vertical[1])[1]
}
