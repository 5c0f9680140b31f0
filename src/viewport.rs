use std::ops::Range;

/// Cursor and scroll position over a listing.
///
/// After every transition `offset <= cursor < offset + height` and
/// `row == cursor - offset` hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    cursor: usize,
    offset: usize,
    row: usize,
    height: usize,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Viewport {
    pub fn new(height: usize) -> Self {
        Self {
            cursor: 0,
            offset: 0,
            row: 0,
            height: height.max(1),
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `(cursor, offset, row)`
    pub fn position(&self) -> (usize, usize, usize) {
        (self.cursor, self.offset, self.row)
    }

    pub fn move_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
        if self.cursor < self.offset {
            self.offset -= 1;
        }
        if self.row > 0 {
            self.row = self.cursor - self.offset;
        }
    }

    pub fn move_down(&mut self, len: usize) {
        if self.cursor + 1 >= len {
            return;
        }
        self.cursor += 1;
        if self.row + 1 >= self.height {
            self.offset += 1;
        } else {
            self.row += 1;
        }
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
        self.offset = 0;
        self.row = 0;
    }

    /// Apply a new number of visible rows, keeping the cursor on screen.
    pub fn set_height(&mut self, height: usize) {
        self.height = height.max(1);
        if self.row >= self.height {
            self.row = self.height - 1;
            self.offset = self.cursor - self.row;
        }
    }

    /// Pull the cursor back inside a listing of `len` entries.
    pub fn clamp(&mut self, len: usize) {
        let last = len.saturating_sub(1);
        if self.cursor <= last {
            return;
        }
        self.cursor = last;
        if self.offset > self.cursor {
            self.offset = self.cursor;
        }
        // show as many rows as fit above the new last entry
        let lowest_offset = len.saturating_sub(self.height);
        if self.offset > lowest_offset {
            self.offset = lowest_offset;
        }
        self.row = self.cursor - self.offset;
    }

    /// Indices of the listing entries currently on screen.
    pub fn window(&self, len: usize) -> Range<usize> {
        let start = self.offset.min(len);
        let end = (self.offset + self.height).min(len);
        start..end
    }
}
