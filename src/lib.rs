// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. settings::SettingsStore)
    clippy::module_name_repetitions
)]

//! # Autoread
//!
//! A terminal markdown editor that switches idle documents to reading mode.
//!
//! After a configurable period without edits, every open markdown document
//! flips from source editing to a rendered preview. Optionally, documents
//! restored at startup open in preview right away.
//!
//! ## Architecture
//!
//! The editor uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: State transitions
//! - **View**: Render to terminal
//!
//! The idle-preview logic itself lives in [`preview`] and only sees the
//! host through the [`preview::Workspace`] and [`settings::SettingsStore`]
//! traits.
//!
//! ## Modules
//!
//! - [`preview`]: Idle-preview controller, countdown and startup latch
//! - [`settings`]: Persisted settings and their storage
//! - [`settings_panel`]: Settings controls bound to the controller
//! - [`app`]: Main application loop and state
//! - [`editor`]: Source text buffer
//! - [`document`]: Markdown rendering for reading mode
//! - [`ui`]: Terminal UI components
//! - [`watcher`]: Settings file watching

pub mod app;
pub mod document;
pub mod editor;
pub mod preview;
pub mod settings;
pub mod settings_panel;
pub mod ui;
pub mod watcher;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::preview::{DocumentView, HostEvent, IdlePreviewController, Workspace};
    pub use crate::settings::{Settings, SettingsStore};
}
