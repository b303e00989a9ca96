//! PFData CLI - terminal browser and editor for PFData resource archives.
//!
//! This is the main entry point for the `pfdata` command-line application.

mod config;
mod shell;
mod terminal;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use pfdata::session::{PreviewArtifacts, Workspace};

use config::Config;
use terminal::Terminal;

/// PFData - browse and edit game resource archives
#[derive(Parser, Debug)]
#[command(name = "pfdata")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Archive to open on startup
    #[arg(env = "PFDATA_ARCHIVE")]
    archive: Option<PathBuf>,
}

fn main() -> Result<()> {
    let config = Config::from_cli(Cli::parse());

    tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .with_writer(std::io::stderr)
        .init();

    let artifacts = match &config.temp_dir {
        Some(dir) => PreviewArtifacts::new_in(dir)
            .with_context(|| format!("Failed to create preview directory in {}", dir.display()))?,
        None => PreviewArtifacts::new().context("Failed to create preview directory")?,
    };
    let mut workspace = Workspace::new(artifacts);

    if let Some(path) = &config.archive {
        // A bad startup archive is reported, the shell still starts.
        match workspace.open_archive(path) {
            Ok(catalog) => println!(
                "Loaded {} resources from {}",
                catalog.len(),
                path.display()
            ),
            Err(e) => eprintln!("error: Failed to open {}: {e}", path.display()),
        }
    }

    info!(title = %workspace.title(), "shell starting");
    shell::run(&mut workspace, &mut Terminal::new())
}
