use std::path::PathBuf;

use tracing::{info, warn};

use crate::app::{App, Message, Model, ToastLevel};
use crate::watcher::FileWatcher;

/// Settle time for settings-file change bursts.
const SETTINGS_DEBOUNCE_MS: u64 = 200;

impl App {
    pub(super) fn make_settings_watcher(&self) -> notify::Result<FileWatcher> {
        // The directory must exist to be watched, even before the first save.
        if let Some(parent) = self.settings_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(notify::Error::io)?;
        }
        FileWatcher::new(&self.settings_path, SETTINGS_DEBOUNCE_MS)
    }

    /// Perform the I/O a message asks for after the model has been updated.
    pub(super) fn handle_message_side_effects(model: &mut Model, msg: &Message) {
        match msg {
            Message::Save => save_active(model),
            Message::SubmitOpenPrompt => {
                let Some(text) = model.open_prompt.take() else {
                    return;
                };
                let text = text.trim();
                if text.is_empty() {
                    return;
                }
                let path = PathBuf::from(text);
                if let Err(err) = model.open_file(&path) {
                    warn!(path = %path.display(), error = %err, "open failed");
                    model.show_toast(ToastLevel::Error, format!("Open failed: {err:#}"));
                }
            }
            Message::SettingsFileChanged => reload_settings(model),
            _ => {}
        }
    }
}

fn save_active(model: &mut Model) {
    let Some(pane) = model.active_pane_mut() else {
        return;
    };
    match pane.save() {
        Ok(()) => {
            info!(path = %pane.path.display(), "saved");
            let name = pane.title();
            model.show_toast(ToastLevel::Info, format!("Saved {name}"));
        }
        Err(err) => {
            warn!(path = %pane.path.display(), error = %err, "save failed");
            model.show_toast(ToastLevel::Error, format!("Save failed: {err:#}"));
        }
    }
}

fn reload_settings(model: &mut Model) {
    match model.controller.reload_settings() {
        Ok(true) => {
            model.panel.sync(model.controller.settings());
            info!(settings = ?model.controller.settings(), "settings reloaded");
            model.show_toast(ToastLevel::Info, "Settings reloaded");
        }
        Ok(false) => {}
        Err(err) => {
            warn!(error = %err, "settings reload failed");
            model.show_toast(ToastLevel::Warning, format!("Settings reload failed: {err}"));
        }
    }
}
