use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pud",
    about = "Browse directories in the terminal and pick up where you left off",
    version,
    long_about = "pud is an interactive terminal directory navigator. Move with the arrow keys or the mouse, enter directories and go back to their parents; the cursor position in each parent is remembered.\n\nLogging is off unless --log-file is given; RUST_LOG then sets the level (default info). The log never goes to stderr, which the TUI draws over."
)]
pub struct Args {
    #[arg(help = "Directory to start browsing in (defaults to the current directory)")]
    pub path: Option<PathBuf>,

    #[arg(long, default_value = "=>", help = "The cursor to use")]
    pub cursor: String,

    #[arg(long, help = "Do not keep the cursor state after entering/leaving a directory")]
    pub no_keep_state: bool,

    #[arg(short, long, help = "Show the current directory relative to the start directory")]
    pub relative: bool,

    #[arg(long, value_name = "FILE", help = "Write log records to FILE (level from RUST_LOG)")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Validate options before the terminal is taken over
    pub fn validate(&self) -> Result<(), String> {
        if self.cursor.trim().is_empty() {
            return Err("Cursor must not be empty".to_string());
        }
        if let Some(path) = &self.path {
            if !path.exists() {
                return Err(format!("Path does not exist: {}", path.display()));
            }
            if !path.is_dir() {
                return Err(format!("Not a directory: {}", path.display()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["pud"]);
        assert_eq!(args.cursor, "=>");
        assert!(!args.no_keep_state);
        assert!(!args.relative);
        assert!(args.path.is_none());
        assert!(args.log_file.is_none());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_blank_cursor_is_rejected() {
        let args = Args::parse_from(["pud", "--cursor", "   "]);
        assert_eq!(args.validate().unwrap_err(), "Cursor must not be empty");
    }

    #[test]
    fn test_file_path_is_rejected() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "x").unwrap();
        let args = Args::parse_from([OsStr::new("pud"), file.as_os_str()]);
        assert!(args.validate().unwrap_err().contains("Not a directory"));
    }

    #[test]
    fn test_directory_path_is_accepted() {
        let dir = tempdir().unwrap();
        let args = Args::parse_from([
            OsStr::new("pud"),
            dir.path().as_os_str(),
            OsStr::new("--no-keep-state"),
        ]);
        assert!(args.no_keep_state);
        assert!(args.validate().is_ok());
    }
}
