use std::ops::Range;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::entry::EntryKind;

/// Two left presses on the same row within this window open the row.
pub const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(400);

/// Key/description pairs shown in the help overlay.
pub const HELP_ITEMS: [(&str, &str); 7] = [
    ("↑/k/w", "Move up"),
    ("↓/j/s", "Move down"),
    ("Enter/→/l/d", "Enter directory"),
    ("←/Backspace/h/b/a", "Go to parent directory"),
    ("Double click", "Open row"),
    ("?", "Show / hide this help"),
    ("q/Esc/Ctrl-C", "Exit"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browsing,
    HelpOverlay,
    Terminated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    MoveUp,
    MoveDown,
    /// Open the entry under the cursor.
    Enter,
    Back,
    /// Open a row picked with the mouse.
    Open { name: String, kind: EntryKind },
    ShowHelp,
    DismissHelp,
    Quit,
}

/// Map a key press to an action for the given mode.
pub fn key_action(mode: Mode, key: &KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }
    match mode {
        Mode::Terminated => None,
        Mode::HelpOverlay => match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Enter => Some(Action::DismissHelp),
            _ => None,
        },
        Mode::Browsing => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            KeyCode::Char('?') => Some(Action::ShowHelp),
            KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('w') => Some(Action::MoveUp),
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('s') => Some(Action::MoveDown),
            KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('d') => {
                Some(Action::Enter)
            }
            KeyCode::Left
            | KeyCode::Backspace
            | KeyCode::Char('h')
            | KeyCode::Char('b')
            | KeyCode::Char('a') => Some(Action::Back),
            _ => None,
        },
    }
}

/// Screen area occupied by one drawn entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitRegion {
    pub row: u16,
    pub columns: Range<u16>,
    pub name: String,
    pub kind: EntryKind,
}

/// Entry regions published by the most recent frame.
#[derive(Debug, Clone, Default)]
pub struct HitMap {
    regions: Vec<HitRegion>,
}

impl HitMap {
    pub fn push(&mut self, region: HitRegion) {
        self.regions.push(region);
    }

    pub fn resolve(&self, column: u16, row: u16) -> Option<&HitRegion> {
        self.regions
            .iter()
            .find(|r| r.row == row && r.columns.contains(&column))
    }
}

/// Turns single left presses into double clicks.
#[derive(Debug, Default)]
pub struct ClickTracker {
    last: Option<(Instant, u16)>,
}

impl ClickTracker {
    /// Record a left press on `row`; true when it completes a double click.
    pub fn register(&mut self, row: u16, now: Instant) -> bool {
        let double = matches!(
            self.last,
            Some((at, last_row)) if last_row == row && now.duration_since(at) < DOUBLE_CLICK_WINDOW
        );
        self.last = if double { None } else { Some((now, row)) };
        double
    }
}

/// Map a mouse event to an action. Only scrolling and double clicks on a
/// drawn entry do anything, and only while browsing.
pub fn mouse_action(
    mode: Mode,
    mouse: &MouseEvent,
    clicks: &mut ClickTracker,
    hits: &HitMap,
    now: Instant,
) -> Option<Action> {
    if mode != Mode::Browsing {
        return None;
    }
    match mouse.kind {
        MouseEventKind::ScrollUp => Some(Action::MoveUp),
        MouseEventKind::ScrollDown => Some(Action::MoveDown),
        MouseEventKind::Down(MouseButton::Left) => {
            if !clicks.register(mouse.row, now) {
                return None;
            }
            hits.resolve(mouse.column, mouse.row).map(|hit| Action::Open {
                name: hit.name.clone(),
                kind: hit.kind,
            })
        }
        _ => None,
    }
}
