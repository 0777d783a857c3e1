//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: State transitions; host events are forwarded to the
//!   idle-preview controller from here
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Controller, Model, Pane, TEXT_VIEW, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::settings::{SettingsOverrides, default_settings_path};

/// Main application struct that owns the terminal and runs the event loop.
#[derive(Debug, Clone)]
pub struct App {
    files: Vec<PathBuf>,
    settings_path: PathBuf,
    overrides: SettingsOverrides,
    watch_settings: bool,
}

impl App {
    /// Create a new application for the given files.
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self {
            files,
            settings_path: default_settings_path(),
            overrides: SettingsOverrides::default(),
            watch_settings: true,
        }
    }

    /// Use a specific settings file.
    pub fn with_settings_path(mut self, path: PathBuf) -> Self {
        self.settings_path = path;
        self
    }

    /// Layer session overrides on top of the stored settings.
    pub const fn with_overrides(mut self, overrides: SettingsOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Enable or disable reloading the settings file when it changes.
    pub const fn with_settings_watch(mut self, enabled: bool) -> Self {
        self.watch_settings = enabled;
        self
    }
}
