use anyhow::{Context, Result};
use clap::Parser;
use std::env;

mod cli;
mod context;
mod dispatch;
mod entry;
mod error;
mod listing;
mod logging;
mod navigator;
mod tui;
mod viewport;

use cli::Args;
use navigator::Navigator;
use tui::ViewOptions;

fn main() -> Result<()> {
    let args = Args::parse();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    logging::init(args.log_file.as_deref())?;

    let start = match &args.path {
        Some(path) => path.clone(),
        None => env::current_dir().context("Failed to read current directory")?,
    };
    let start = start
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", start.display()))?;
    log::info!(
        "starting in {} (keep state: {})",
        start.display(),
        !args.no_keep_state
    );

    let view = ViewOptions::new(&args.cursor, args.relative.then(|| start.clone()));
    let mut navigator = Navigator::new(start, !args.no_keep_state);
    tui::run_tui(&mut navigator, &view)
}
