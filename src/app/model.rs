use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::warn;

use crate::document::is_markdown_path;
use crate::editor::EditorBuffer;
use crate::preview::{
    DocumentView, HostEvent, IdlePreviewController, MARKDOWN_VIEW, ViewMode, ViewState,
};
use crate::settings::SettingsStore;
use crate::settings_panel::SettingsPanel;

/// View type of panes holding anything other than markdown.
pub const TEXT_VIEW: &str = "text";

/// Key of the preview scroll offset inside a pane's view state.
const SCROLL_KEY: &str = "scroll";

pub type Controller = IdlePreviewController<Box<dyn SettingsStore>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// One open document: the host's document view.
#[derive(Debug)]
pub struct Pane {
    pub path: PathBuf,
    pub buffer: EditorBuffer,
    /// First visible buffer line in source mode.
    pub editor_scroll: usize,
    view_state: ViewState,
}

impl Pane {
    /// A pane in source mode for `path` holding `text`.
    pub fn new(path: PathBuf, text: &str) -> Self {
        let view_type = if is_markdown_path(&path) {
            MARKDOWN_VIEW
        } else {
            TEXT_VIEW
        };
        let view_state = ViewState::new(view_type)
            .with_state_field("file", path.display().to_string())
            .with_mode(ViewMode::Source)
            .with_state_field(SCROLL_KEY, 0);
        Self {
            path,
            buffer: EditorBuffer::from_text(text),
            editor_scroll: 0,
            view_state,
        }
    }

    /// Load `path` from disk; a missing file opens as an empty new document.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read.
    pub fn open(path: &Path) -> Result<Self> {
        let text = if path.exists() {
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?
        } else {
            String::new()
        };
        Ok(Self::new(path.to_path_buf(), &text))
    }

    /// Write the buffer to disk and mark it clean.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn save(&mut self) -> Result<()> {
        std::fs::write(&self.path, self.buffer.text())
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        self.buffer.mark_clean();
        Ok(())
    }

    pub fn is_markdown(&self) -> bool {
        self.view_state.view_type == MARKDOWN_VIEW
    }

    /// Current mode; panes without a recognised mode are treated as source.
    pub fn mode(&self) -> ViewMode {
        self.view_state.mode().unwrap_or(ViewMode::Source)
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        self.view_state = self.view_state.with_mode(mode);
    }

    pub fn preview_scroll(&self) -> usize {
        self.view_state
            .state
            .get(SCROLL_KEY)
            .and_then(Value::as_u64)
            .and_then(|v| usize::try_from(v).ok())
            .unwrap_or(0)
    }

    pub fn set_preview_scroll(&mut self, offset: usize) {
        self.view_state
            .state
            .insert(SCROLL_KEY.to_string(), Value::from(offset));
    }

    pub fn title(&self) -> String {
        let name = self.path.file_name().map_or_else(
            || "untitled".to_string(),
            |s| s.to_string_lossy().to_string(),
        );
        if self.buffer.is_dirty() {
            format!("{name} *")
        } else {
            name
        }
    }

    /// Keep the cursor inside a source viewport of `height` rows.
    pub const fn follow_cursor(&mut self, height: usize) {
        let line = self.buffer.cursor().line;
        if line < self.editor_scroll {
            self.editor_scroll = line;
        } else if height > 0 && line >= self.editor_scroll + height {
            self.editor_scroll = line + 1 - height;
        }
    }
}

impl DocumentView for Pane {
    fn view_type(&self) -> &str {
        &self.view_state.view_type
    }

    fn view_state(&self) -> ViewState {
        self.view_state.clone()
    }

    fn set_view_state(&mut self, state: ViewState) {
        self.view_state = state;
    }
}

/// The complete application state.
pub struct Model {
    /// Open documents, in tab order
    pub panes: Vec<Pane>,
    /// Index of the active pane
    pub active: usize,
    /// Idle-preview controller driven by host events
    pub controller: Controller,
    /// Settings panel state
    pub panel: SettingsPanel,
    /// Whether the settings overlay is visible
    pub panel_visible: bool,
    /// Open-file prompt text while the prompt is active
    pub open_prompt: Option<String>,
    /// Milliseconds since the event loop started, stamped before each update
    pub now_ms: u64,
    /// Terminal size (columns, rows)
    pub terminal_size: (u16, u16),
    /// Whether the app should quit
    pub should_quit: bool,
    /// Set after first quit attempt with unsaved changes; allows second quit to proceed
    pub quit_confirmed: bool,
    /// Set after first close attempt on a modified pane
    pub close_confirmed: bool,
    toast: Option<Toast>,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("panes", &self.panes.len())
            .field("active", &self.active)
            .field("settings", self.controller.settings())
            .field("panel_visible", &self.panel_visible)
            .finish_non_exhaustive()
    }
}

impl Model {
    pub fn new(panes: Vec<Pane>, controller: Controller, terminal_size: (u16, u16)) -> Self {
        let panel = SettingsPanel::new(controller.settings());
        Self {
            panes,
            active: 0,
            controller,
            panel,
            panel_visible: false,
            open_prompt: None,
            now_ms: 0,
            terminal_size,
            should_quit: false,
            quit_confirmed: false,
            close_confirmed: false,
            toast: None,
        }
    }

    pub fn active_pane(&self) -> Option<&Pane> {
        self.panes.get(self.active)
    }

    pub fn active_pane_mut(&mut self) -> Option<&mut Pane> {
        self.panes.get_mut(self.active)
    }

    /// Rows available to a pane's content (minus tab bar and status bar).
    pub const fn content_height(&self) -> usize {
        self.terminal_size.1.saturating_sub(2) as usize
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.panes.iter().any(|p| p.buffer.is_dirty())
    }

    /// Deliver a host event to the controller.
    pub fn notify(&mut self, event: HostEvent) {
        match self
            .controller
            .handle_event(event, self.now_ms, &mut self.panes)
        {
            Ok(Some(count)) => self.report_preview_pass(count),
            Ok(None) => {}
            Err(err) => {
                warn!(%err, ?event, "idle preview event failed");
                self.show_toast(ToastLevel::Error, format!("Settings error: {err}"));
            }
        }
    }

    /// Advance the inactivity countdown to `now_ms`. Returns true if views changed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        self.now_ms = now_ms;
        if let Some(count) = self.controller.poll(now_ms, &mut self.panes) {
            self.report_preview_pass(count);
            return true;
        }
        false
    }

    fn report_preview_pass(&mut self, count: usize) {
        if count > 0 {
            let noun = if count == 1 { "document" } else { "documents" };
            self.show_toast(
                ToastLevel::Info,
                format!("Reading mode: {count} {noun}"),
            );
        }
    }

    /// Open `path` in a new pane (or focus it if already open) and make it active.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read.
    pub fn open_file(&mut self, path: &Path) -> Result<()> {
        if let Some(idx) = self.panes.iter().position(|p| p.path == path) {
            self.active = idx;
            self.notify(HostEvent::ActiveViewChanged);
            return Ok(());
        }
        let pane = Pane::open(path)?;
        self.panes.push(pane);
        self.active = self.panes.len() - 1;
        self.notify(HostEvent::FileOpened);
        Ok(())
    }

    pub fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(4),
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}
