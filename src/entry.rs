use std::fs::Metadata;
use std::time::SystemTime;

use chrono::{DateTime, Local};

/// Names longer than this are cut short when drawn.
const MAX_LABEL_CHARS: usize = 29;

const SIZE_UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Synthetic "go up one level" row, never read from disk.
    ParentMarker,
    Directory,
    File,
}

/// One row of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub kind: EntryKind,
    pub size: Option<String>,
    pub modified: Option<String>,
}

impl Entry {
    pub fn parent_marker() -> Self {
        Self {
            name: String::from(".."),
            kind: EntryKind::ParentMarker,
            size: None,
            modified: None,
        }
    }

    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Directory,
            size: None,
            modified: None,
        }
    }

    pub fn file(name: impl Into<String>, bytes: u64) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
            size: Some(format_size(bytes)),
            modified: None,
        }
    }

    /// Build an entry from the metadata of a child named `name`.
    pub fn from_metadata(name: String, md: &Metadata) -> Self {
        let mut entry = if md.is_dir() {
            Self::directory(name)
        } else {
            Self::file(name, md.len())
        };
        entry.modified = md.modified().ok().map(format_modified);
        entry
    }

    pub fn is_dir_like(&self) -> bool {
        !matches!(self.kind, EntryKind::File)
    }

    /// Text drawn in the name column, without the cursor prefix.
    pub fn label(&self) -> String {
        match self.kind {
            EntryKind::ParentMarker => String::from("<<< Go Back"),
            EntryKind::Directory => format!("📁 /{}", truncate_name(&self.name)),
            EntryKind::File => format!("📄 {}", truncate_name(&self.name)),
        }
    }
}

fn truncate_name(name: &str) -> String {
    if name.chars().count() > MAX_LABEL_CHARS {
        let head: String = name.chars().take(MAX_LABEL_CHARS).collect();
        format!("{head}...")
    } else {
        name.to_string()
    }
}

/// Format a byte count as e.g. `512.0B` or `1.5KB`.
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value > 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1}{}", SIZE_UNITS[unit])
}

/// Local-time display of a modification timestamp.
pub fn format_modified(time: SystemTime) -> String {
    let dt: DateTime<Local> = time.into();
    dt.format("%x %I:%M:%S").to_string()
}
