//! Autoread - a terminal markdown editor that switches idle documents to reading mode.
//!
//! # Usage
//!
//! ```bash
//! autoread README.md NOTES.md
//! autoread --timeout 2 README.md
//! autoread --no-startup-preview --save
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use autoread::app::App;
use autoread::settings::{
    JsonFileStore, Settings, SettingsOverrides, SettingsStore, StartupPolicy, clear_settings,
    default_settings_path,
};

/// A terminal markdown editor that switches idle documents to reading mode
#[derive(Parser, Debug)]
#[command(name = "autoread", version, about, long_about = None)]
struct Cli {
    /// Files to open
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Settings file to use instead of the default location
    #[arg(long, value_name = "PATH", env = "AUTOREAD_SETTINGS")]
    settings: Option<PathBuf>,

    /// Minutes without edits before documents switch to reading mode
    #[arg(long, value_name = "MINUTES")]
    timeout: Option<u32>,

    /// Do not open restored documents in reading mode
    #[arg(long, conflicts_with = "startup_preview")]
    no_startup_preview: bool,

    /// Open restored documents in reading mode
    #[arg(long)]
    startup_preview: bool,

    /// When the one-time startup switch happens
    #[arg(long, value_enum)]
    startup_policy: Option<StartupPolicy>,

    /// Save the given options to the settings file
    #[arg(long)]
    save: bool,

    /// Delete the settings file before starting
    #[arg(long)]
    clear: bool,

    /// Write logs to a file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> SettingsOverrides {
        let preview_on_startup = if self.no_startup_preview {
            Some(false)
        } else if self.startup_preview {
            Some(true)
        } else {
            None
        };
        SettingsOverrides {
            timeout_minutes: self.timeout,
            preview_on_startup,
            startup_policy: self.startup_policy,
        }
    }
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into());
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        // Anything printed to the terminal would land on the alternate screen.
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::sink)
            .init(),
    }
    Ok(())
}

/// Write the effective settings (stored values plus overrides) back to the file.
fn save_overrides(path: &Path, overrides: &SettingsOverrides) -> Result<Settings> {
    let mut store = JsonFileStore::new(path);
    let stored = Settings::from_blob(store.load_data()?)
        .with_context(|| format!("Invalid settings in {}", path.display()))?;
    let effective = overrides.apply(&stored);
    store.save_data(&effective.to_blob()?)?;
    Ok(effective)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let settings_path = cli.settings.clone().unwrap_or_else(default_settings_path);
    let overrides = cli.overrides();

    if cli.clear {
        clear_settings(&settings_path)
            .with_context(|| format!("Failed to clear {}", settings_path.display()))?;
        tracing::info!(path = %settings_path.display(), "settings cleared");
    }
    if cli.save {
        let saved = save_overrides(&settings_path, &overrides)
            .with_context(|| format!("Failed to save {}", settings_path.display()))?;
        tracing::info!(path = %settings_path.display(), ?saved, "settings saved");
        if cli.files.is_empty() {
            return Ok(());
        }
    }

    let mut app = App::new(cli.files)
        .with_settings_path(settings_path)
        .with_overrides(overrides);

    app.run().context("Application error")
}
