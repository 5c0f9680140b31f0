use std::path::{Path, PathBuf};

use crate::entry::{Entry, EntryKind};
use crate::error::NavError;
use crate::listing::ListingProvider;
use crate::viewport::Viewport;

/// Outcome of a successful `enter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Moved {
    Entered,
    WentBack,
    /// Already at the filesystem root.
    Stayed,
}

/// The directory being browsed and the viewport states left behind in its
/// ancestors.
///
/// Every successful `enter` pushes exactly one state; every `go_back` pops at
/// most one. The bottom element is a sentinel that is never popped.
#[derive(Debug, Clone)]
pub struct DirContext {
    current_path: PathBuf,
    stack: Vec<Viewport>,
    preserve: bool,
}

impl DirContext {
    pub fn new(start: PathBuf, preserve: bool) -> Self {
        Self {
            current_path: start,
            stack: vec![Viewport::default()],
            preserve,
        }
    }

    pub fn current_path(&self) -> &Path {
        &self.current_path
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Open `entry` from the current directory.
    ///
    /// Files are refused with `NotADirectory`; the marker behaves like
    /// `go_back`. A directory that cannot be changed into is refused without
    /// any state change; one that can be entered but not listed is entered.
    pub fn enter(
        &mut self,
        entry: &Entry,
        viewport: &mut Viewport,
        provider: &dyn ListingProvider,
    ) -> Result<Moved, NavError> {
        match entry.kind {
            EntryKind::File => Err(NavError::NotADirectory(self.current_path.join(&entry.name))),
            EntryKind::ParentMarker => Ok(self.go_back(viewport)),
            EntryKind::Directory => {
                let target = self.current_path.join(&entry.name);
                // probe before committing so a refused directory changes nothing
                provider.check_enter(&target)?;

                self.stack.push(*viewport);
                log::debug!(
                    "enter {} (saved {:?}, depth {})",
                    target.display(),
                    viewport.position(),
                    self.stack.len()
                );
                self.current_path = target;
                viewport.reset();
                Ok(Moved::Entered)
            }
        }
    }

    /// Move to the parent directory, restoring the state saved when it was left.
    pub fn go_back(&mut self, viewport: &mut Viewport) -> Moved {
        let Some(parent) = self.current_path.parent().map(Path::to_path_buf) else {
            return Moved::Stayed;
        };
        self.current_path = parent;

        let saved = if self.stack.len() > 1 { self.stack.pop() } else { None };
        match saved {
            Some(state) if self.preserve => {
                let height = viewport.height();
                *viewport = state;
                viewport.set_height(height);
            }
            _ => viewport.reset(),
        }
        log::debug!(
            "back to {} (now {:?}, depth {})",
            self.current_path.display(),
            viewport.position(),
            self.stack.len()
        );
        Moved::WentBack
    }
}
