use std::path::{Path, PathBuf};
use std::time::Instant;

use crossterm::event::Event;

use crate::context::{DirContext, Moved};
use crate::dispatch::{self, Action, ClickTracker, HitMap, Mode};
use crate::entry::EntryKind;
use crate::error::NavError;
use crate::listing::{Listing, ListingProvider};
use crate::viewport::Viewport;

/// Browsing session: where we are, what is selected and which mode the
/// input is interpreted in.
pub struct Navigator {
    context: DirContext,
    viewport: Viewport,
    mode: Mode,
    /// Describes the listing of the current directory (denied, empty).
    status: Option<String>,
    /// Failure of the last action, cleared by the next one.
    flash: Option<String>,
    hits: HitMap,
    clicks: ClickTracker,
}

impl Navigator {
    pub fn new(start: PathBuf, preserve_state: bool) -> Self {
        Self {
            context: DirContext::new(start, preserve_state),
            viewport: Viewport::default(),
            mode: Mode::Browsing,
            status: None,
            flash: None,
            hits: HitMap::default(),
            clicks: ClickTracker::default(),
        }
    }

    pub fn current_path(&self) -> &Path {
        self.context.current_path()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn context(&self) -> &DirContext {
        &self.context
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_terminated(&self) -> bool {
        self.mode == Mode::Terminated
    }

    pub fn notice(&self) -> Option<&str> {
        self.flash.as_deref().or(self.status.as_deref())
    }

    /// Regions of the frame just drawn, used to resolve mouse clicks.
    pub fn publish_hits(&mut self, hits: HitMap) {
        self.hits = hits;
    }

    /// Read the current directory afresh for the next frame and fit the
    /// viewport to it.
    pub fn refresh(&mut self, provider: &dyn ListingProvider, height: usize) -> Listing {
        let listing = match provider.list(self.context.current_path()) {
            Ok(listing) => {
                self.status = listing
                    .has_no_children()
                    .then(|| String::from("Directory empty."));
                listing
            }
            Err(err) => {
                log::warn!("{err}");
                self.status = Some(err.notice().to_string());
                Listing::marker_only()
            }
        };
        self.viewport.set_height(height);
        self.viewport.clamp(listing.len());
        listing
    }

    /// Interpret one raw input event against the listing that was on screen.
    pub fn handle_event(
        &mut self,
        event: &Event,
        listing: &Listing,
        provider: &dyn ListingProvider,
        now: Instant,
    ) {
        let action = match event {
            Event::Key(key) => dispatch::key_action(self.mode, key),
            Event::Mouse(mouse) => {
                dispatch::mouse_action(self.mode, mouse, &mut self.clicks, &self.hits, now)
            }
            _ => None,
        };
        if let Some(action) = action {
            self.apply(action, listing, provider);
        }
    }

    pub fn apply(&mut self, action: Action, listing: &Listing, provider: &dyn ListingProvider) {
        log::debug!("{:?} in {:?}", action, self.mode);
        match (self.mode, action) {
            (Mode::Terminated, _) => {}
            (_, Action::Quit) => self.mode = Mode::Terminated,
            (Mode::HelpOverlay, Action::DismissHelp) => self.mode = Mode::Browsing,
            (Mode::HelpOverlay, _) => {}
            (Mode::Browsing, action) => {
                self.flash = None;
                self.browse(action, listing, provider);
            }
        }
    }

    fn browse(&mut self, action: Action, listing: &Listing, provider: &dyn ListingProvider) {
        match action {
            Action::MoveUp => self.viewport.move_up(),
            Action::MoveDown => self.viewport.move_down(listing.len()),
            Action::Back => {
                self.context.go_back(&mut self.viewport);
            }
            Action::Enter => {
                if let Some(entry) = listing.get(self.viewport.cursor()) {
                    let result = self.context.enter(entry, &mut self.viewport, provider);
                    self.settle(result);
                }
            }
            Action::Open { name, kind } => {
                if kind == EntryKind::ParentMarker {
                    self.context.go_back(&mut self.viewport);
                } else if let Some(entry) = listing.find(&name, kind) {
                    let result = self.context.enter(entry, &mut self.viewport, provider);
                    self.settle(result);
                }
            }
            Action::ShowHelp => self.mode = Mode::HelpOverlay,
            Action::DismissHelp | Action::Quit => {}
        }
    }

    fn settle(&mut self, result: Result<Moved, NavError>) {
        match result {
            Ok(_) => {}
            Err(NavError::NotADirectory(path)) => {
                log::debug!("ignoring enter on file {}", path.display());
            }
            Err(err) => {
                log::warn!("{err}");
                self.flash = Some(err.notice().to_string());
            }
        }
    }
}
