use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Recoverable failures raised while listing or moving between directories.
///
/// None of these abort the event loop: the navigator turns them into a
/// notice and degrades to a no-op.
#[derive(Debug, Error)]
pub enum NavError {
    #[error("Permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Cannot read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl NavError {
    /// Classify an I/O error raised for `path`.
    pub fn from_io(path: PathBuf, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => NavError::PermissionDenied(path),
            _ => NavError::Unreadable { path, source: err },
        }
    }

    /// Short text shown in the footer when this error is recovered from.
    pub fn notice(&self) -> &'static str {
        match self {
            NavError::PermissionDenied(_) => "Permission denied.",
            NavError::NotADirectory(_) => "Not a directory.",
            NavError::Unreadable { .. } => "Directory could not be read.",
        }
    }
}
