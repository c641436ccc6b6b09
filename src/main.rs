//! Markpad - A terminal Markdown editor with a live HTML preview.
//!
//! # Usage
//!
//! ```bash
//! markpad
//! markpad notes.md
//! markpad --safe-html --preview-percent 60 notes.md
//! ```

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use markpad::app::App;
use markpad::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    save_config_flags,
};
use markpad::document::OsFileSystem;
use markpad::render::Renderer;
use markpad::ui::{TerminalOptions, TerminalShell};

/// A terminal Markdown editor with a live HTML preview
#[derive(Parser, Debug)]
#[command(name = "markpad", version, about, long_about = None)]
struct Cli {
    /// Markdown file to open (created on first save if it does not exist)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Do not pass raw HTML in the Markdown through to the preview
    #[arg(long)]
    safe_html: bool,

    /// Leave the mouse to the terminal (no clicking on buttons or links)
    #[arg(long)]
    no_mouse: bool,

    /// Share of the window width given to the preview pane
    #[arg(long, value_name = "PERCENT", value_parser = clap::value_parser!(u16).range(10..=90))]
    preview_percent: Option<u16>,

    /// Write log output to a file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Save current command-line flags as defaults in the global config
    #[arg(long)]
    save: bool,

    /// Clear saved defaults in the global config
    #[arg(long)]
    clear: bool,
}

impl Cli {
    fn flags(&self) -> ConfigFlags {
        ConfigFlags {
            safe_html: self.safe_html,
            no_mouse: self.no_mouse,
            preview_percent: self.preview_percent,
            log_file: self.log_file.clone(),
        }
    }
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let (writer, level, ansi) = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            (BoxMakeWriter::new(Mutex::new(file)), tracing::Level::INFO, false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), tracing::Level::WARN, true),
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(writer)
        .with_ansi(ansi)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = cli.flags();

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(effective.log_file.as_deref())?;

    let shell = TerminalShell::init(TerminalOptions {
        mouse: !effective.no_mouse,
        preview_percent: effective.effective_preview_percent(),
    })?;
    let mut app =
        App::new(shell, OsFileSystem).with_renderer(Renderer::new().with_safe_html(effective.safe_html));

    if let Some(path) = &cli.file {
        app.open_file(path);
    }

    app.run().context("Application error")
}
