use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use ratatui::DefaultTerminal;
use tracing::{debug, warn};

use crate::app::{App, Controller, Message, Model, Pane, ToastLevel, update};
use crate::preview::IdlePreviewController;
use crate::settings::{JsonFileStore, Settings, SettingsStore};

/// Longest wait for terminal input when nothing is scheduled sooner.
const IDLE_POLL_MS: u64 = 250;

pub(super) struct ResizeDebouncer {
    delay_ms: u64,
    pending: Option<(u16, u16, u64)>,
}

impl ResizeDebouncer {
    pub(super) const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub(super) const fn queue(&mut self, width: u16, height: u16, now_ms: u64) {
        self.pending = Some((width, height, now_ms));
    }

    pub(super) fn take_ready(&mut self, now_ms: u64) -> Option<(u16, u16)> {
        let (width, height, queued_at) = self.pending?;
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.pending = None;
            Some((width, height))
        } else {
            None
        }
    }

    pub(super) const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Milliseconds since `start`, the clock every debouncer in the loop shares.
fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// How long the loop may block on input before something needs attention.
pub(super) fn poll_wait_ms(
    needs_render: bool,
    resize_pending: bool,
    preview_due_in: Option<u64>,
) -> u64 {
    if needs_render {
        return 0;
    }
    let base = if resize_pending { 10 } else { IDLE_POLL_MS };
    preview_due_in.map_or(base, |due| due.min(base))
}

/// The countdown text the status bar shows at the model's current time.
pub(super) fn countdown_label(model: &Model) -> Option<String> {
    model
        .controller
        .next_deadline_in(model.now_ms)
        .map(crate::ui::format_remaining)
}

impl App {
    /// Build the controller: settings file, then command-line overrides.
    pub(super) fn build_controller(&self) -> Result<Controller> {
        let mut store: Box<dyn SettingsStore> =
            Box::new(JsonFileStore::new(self.settings_path.clone()));
        let stored = store
            .load_data()
            .with_context(|| format!("Failed to load {}", self.settings_path.display()))?;
        let base = Settings::from_blob(stored)
            .with_context(|| format!("Invalid settings in {}", self.settings_path.display()))?;
        let settings = self.overrides.apply(&base);
        debug!(?settings, overrides = !self.overrides.is_empty(), "effective settings");
        Ok(IdlePreviewController::with_session_settings(store, base, settings))
    }

    /// Open every file given on the command line, in order.
    pub(super) fn open_panes(&self) -> Result<Vec<Pane>> {
        self.files.iter().map(|path| Pane::open(path)).collect()
    }

    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be loaded, a file cannot be
    /// read, or the terminal fails.
    pub fn run(&mut self) -> Result<()> {
        let controller = self.build_controller()?;
        let panes = self.open_panes()?;

        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal; autoread requires an interactive terminal")?;
        let size = terminal.size()?;

        let mut model = Model::new(panes, controller, (size.width, size.height));
        let result = self.event_loop(&mut terminal, &mut model);

        model.controller.teardown();
        ratatui::restore();

        result
    }

    fn event_loop(&self, terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
        let start = Instant::now();
        let mut resize_debouncer = ResizeDebouncer::new(100);
        let mut settings_watcher = if self.watch_settings {
            match self.make_settings_watcher() {
                Ok(watcher) => Some(watcher),
                Err(err) => {
                    warn!(path = %self.settings_path.display(), error = %err, "settings watch unavailable");
                    model.show_toast(ToastLevel::Warning, format!("Settings watch unavailable: {err}"));
                    None
                }
            }
        } else {
            None
        };

        // Panes are restored before the first frame.
        update(model, Message::LayoutReady);
        let mut needs_render = true;
        let mut shown_countdown = None;

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            let now_ms = elapsed_ms(start);

            if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
                update(model, Message::Resize(width, height));
                needs_render = true;
            }

            if settings_watcher
                .as_mut()
                .is_some_and(|watcher| watcher.take_change_ready(now_ms))
            {
                update(model, Message::SettingsFileChanged);
                Self::handle_message_side_effects(model, &Message::SettingsFileChanged);
                needs_render = true;
            }

            if model.tick(now_ms) {
                needs_render = true;
            }

            // Redraw when the status bar countdown ticks over a second.
            let countdown = countdown_label(model);
            if countdown != shown_countdown {
                shown_countdown = countdown;
                needs_render = true;
            }

            let wait_ms = poll_wait_ms(
                needs_render,
                resize_debouncer.is_pending(),
                model.controller.next_deadline_in(now_ms),
            );
            if event::poll(Duration::from_millis(wait_ms))? {
                // Refresh timestamp after poll wait so the countdown arms from the keypress.
                model.now_ms = elapsed_ms(start);
                let msg = Self::handle_event(
                    &event::read()?,
                    model,
                    model.now_ms,
                    &mut resize_debouncer,
                );
                if let Some(msg) = msg {
                    Self::dispatch(model, msg);
                    needs_render = true;
                }

                // Coalesce key repeat bursts into a single render.
                while event::poll(Duration::from_millis(0))? {
                    model.now_ms = elapsed_ms(start);
                    let msg = Self::handle_event(
                        &event::read()?,
                        model,
                        model.now_ms,
                        &mut resize_debouncer,
                    );
                    if let Some(msg) = msg {
                        Self::dispatch(model, msg);
                        needs_render = true;
                    }
                }
            }

            if needs_render {
                terminal.draw(|frame| crate::ui::render(model, frame))?;
                needs_render = false;
            }

            if model.should_quit {
                break;
            }
        }
        Ok(())
    }

    fn dispatch(model: &mut Model, msg: Message) {
        let side_msg = msg.clone();
        update(model, msg);
        Self::handle_message_side_effects(model, &side_msg);
    }
}
