use anyhow::{Context, Result};
use env_logger::{Builder, Target, WriteStyle};
use log::LevelFilter;
use std::env;
use std::fs::File;
use std::path::Path;

/// Send log records to `log_file`, filtered by `RUST_LOG` (default `info`).
///
/// Without a file nothing is logged: stderr shares the screen with the TUI.
pub fn init(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file: {}", path.display()))?;
    file_logger(file, env::var("RUST_LOG").ok().as_deref()).init();
    Ok(())
}

fn file_logger(file: File, filters: Option<&str>) -> Builder {
    let mut builder = Builder::new();
    builder.filter_level(LevelFilter::Info);
    if let Some(filters) = filters {
        builder.parse_filters(filters);
    }
    builder
        .write_style(WriteStyle::Never)
        .target(Target::Pipe(Box::new(file)));
    builder
}
