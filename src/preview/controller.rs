use tracing::{debug, info};

use crate::settings::{Settings, SettingsError, SettingsStore, StartupPolicy};

use super::countdown::Countdown;
use super::latch::{StartupAction, StartupLatch};
use super::view_state::ViewMode;
use super::workspace::{MARKDOWN_VIEW, Workspace};

/// Notifications the host delivers to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// The host finished restoring its layout.
    LayoutReady,
    /// Document content was edited.
    EditorChanged,
    /// A file was opened into a view.
    FileOpened,
    /// A different view became active.
    ActiveViewChanged,
}

/// Switches idle documents to preview mode.
///
/// Owns the settings, the single inactivity countdown, and the startup
/// latch. All methods run on the host's event-loop thread.
///
/// Two settings layers are kept: `settings` drives behavior for this session
/// and may carry overrides, while `persisted` mirrors the store and is the
/// only layer ever saved.
#[derive(Debug)]
pub struct IdlePreviewController<S: SettingsStore> {
    store: S,
    settings: Settings,
    persisted: Settings,
    countdown: Countdown,
    latch: StartupLatch,
}

impl<S: SettingsStore> IdlePreviewController<S> {
    /// Load settings from `store` and build a controller.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read or holds invalid settings.
    pub fn initialize(mut store: S) -> Result<Self, SettingsError> {
        let settings = Settings::from_blob(store.load_data()?)?;
        debug!(?settings, "idle preview settings loaded");
        Ok(Self::with_settings(store, settings))
    }

    /// Build a controller around already-resolved settings.
    pub fn with_settings(store: S, settings: Settings) -> Self {
        Self::with_session_settings(store, settings.clone(), settings)
    }

    /// Build a controller whose session settings differ from the stored ones.
    ///
    /// Writes start from `persisted`, so session-only values never reach the store.
    pub const fn with_session_settings(store: S, persisted: Settings, session: Settings) -> Self {
        Self {
            store,
            settings: session,
            persisted,
            countdown: Countdown::new(),
            latch: StartupLatch::new(),
        }
    }

    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Settings as last loaded from or saved to the store.
    pub const fn persisted(&self) -> &Settings {
        &self.persisted
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub const fn latch(&self) -> &StartupLatch {
        &self.latch
    }

    /// Dispatch a host notification.
    ///
    /// Returns the number of views switched when a preview pass ran.
    ///
    /// # Errors
    /// Only `LayoutReady` can fail, when recording the first launch cannot be saved.
    pub fn handle_event(
        &mut self,
        event: HostEvent,
        now_ms: u64,
        workspace: &mut dyn Workspace,
    ) -> Result<Option<usize>, SettingsError> {
        match event {
            HostEvent::LayoutReady => self.on_layout_ready(workspace),
            HostEvent::EditorChanged => {
                self.on_edit(now_ms);
                Ok(None)
            }
            HostEvent::FileOpened | HostEvent::ActiveViewChanged => {
                Ok(self.on_view_available(workspace))
            }
        }
    }

    /// Host layout is ready: run, defer, or skip the startup pass.
    ///
    /// # Errors
    /// Returns an error if the first-launch marker cannot be saved.
    pub fn on_layout_ready(
        &mut self,
        workspace: &mut dyn Workspace,
    ) -> Result<Option<usize>, SettingsError> {
        let eligible = workspace.count_of_type(MARKDOWN_VIEW);
        let action = self.latch.on_layout_ready(
            self.settings.preview_on_startup,
            self.settings.startup_policy,
            self.settings.has_started_once,
            eligible,
        );
        if self.settings.startup_policy == StartupPolicy::AfterFirstLaunch
            && !self.settings.has_started_once
            && action != StartupAction::Ignored
        {
            self.settings.has_started_once = true;
            self.persisted.has_started_once = true;
            self.save()?;
        }
        match action {
            StartupAction::RunPass => Ok(Some(self.apply_preview_pass(workspace))),
            StartupAction::Wait
            | StartupAction::Skip
            | StartupAction::RecordFirstLaunch
            | StartupAction::Ignored => Ok(None),
        }
    }

    /// Restart the inactivity countdown.
    pub fn on_edit(&mut self, now_ms: u64) {
        self.countdown.cancel();
        self.countdown.arm(now_ms, self.settings.timeout_ms());
    }

    /// A view opened or became active; releases a deferred startup pass.
    pub fn on_view_available(&mut self, workspace: &mut dyn Workspace) -> Option<usize> {
        let eligible = workspace.count_of_type(MARKDOWN_VIEW);
        if self.latch.on_view_available(eligible) {
            return Some(self.apply_preview_pass(workspace));
        }
        None
    }

    /// Run the preview pass if the countdown has expired.
    pub fn poll(&mut self, now_ms: u64, workspace: &mut dyn Workspace) -> Option<usize> {
        if self.countdown.take_ready(now_ms) {
            return Some(self.apply_preview_pass(workspace));
        }
        None
    }

    /// Switch every open markdown view to preview mode.
    ///
    /// Returns the number of views processed.
    pub fn apply_preview_pass(&mut self, workspace: &mut dyn Workspace) -> usize {
        let views = workspace.views_of_type(MARKDOWN_VIEW);
        let count = views.len();
        for view in views {
            let next = view.view_state().with_mode(ViewMode::Preview);
            view.set_view_state(next);
        }
        info!(views = count, "switched documents to reading mode");
        count
    }

    /// Milliseconds until the countdown fires, if one is pending.
    pub fn next_deadline_in(&self, now_ms: u64) -> Option<u64> {
        self.countdown.remaining_ms(now_ms)
    }

    /// Cancel any pending countdown.
    pub fn teardown(&mut self) {
        self.countdown.cancel();
        debug!("idle preview controller torn down");
    }

    /// Set the timeout and save. A pending countdown keeps its deadline.
    ///
    /// # Errors
    /// Returns an error if the store cannot be written.
    pub fn set_timeout_minutes(&mut self, minutes: u32) -> Result<(), SettingsError> {
        self.settings.timeout_minutes = minutes;
        self.persisted.timeout_minutes = minutes;
        self.save()
    }

    /// # Errors
    /// Returns an error if the store cannot be written.
    pub fn set_preview_on_startup(&mut self, enabled: bool) -> Result<(), SettingsError> {
        self.settings.preview_on_startup = enabled;
        self.persisted.preview_on_startup = enabled;
        self.save()
    }

    /// # Errors
    /// Returns an error if the store cannot be written.
    pub fn set_startup_policy(&mut self, policy: StartupPolicy) -> Result<(), SettingsError> {
        self.settings.startup_policy = policy;
        self.persisted.startup_policy = policy;
        self.save()
    }

    /// Replace all settings and save.
    ///
    /// # Errors
    /// Returns an error if the store cannot be written.
    pub fn replace_settings(&mut self, settings: Settings) -> Result<(), SettingsError> {
        self.persisted = settings.clone();
        self.settings = settings;
        self.save()
    }

    /// Re-read settings from the store, e.g. after an external edit.
    ///
    /// The stored values replace the session settings, overrides included.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read or holds invalid settings.
    pub fn reload_settings(&mut self) -> Result<bool, SettingsError> {
        let loaded = Settings::from_blob(self.store.load_data()?)?;
        let changed = loaded != self.settings;
        self.persisted = loaded.clone();
        self.settings = loaded;
        Ok(changed)
    }

    fn save(&mut self) -> Result<(), SettingsError> {
        let blob = self.persisted.to_blob()?;
        self.store.save_data(&blob)
    }
}
