//! Idle-preview controller.
//!
//! Flips open markdown documents into reading mode after a stretch of
//! editing inactivity, and optionally once at startup:
//! - [`Countdown`]: the single rearmable inactivity deadline
//! - [`StartupLatch`]: one-shot gate for the startup pass
//! - [`ViewState`]: opaque per-view state, copied with one field overridden
//! - [`DocumentView`] / [`Workspace`]: the seams a host implements
//! - [`IdlePreviewController`]: ties the above to settings and host events

mod controller;
mod countdown;
mod latch;
mod view_state;
mod workspace;

pub use controller::{HostEvent, IdlePreviewController};
pub use countdown::Countdown;
pub use latch::{LatchState, StartupAction, StartupLatch};
pub use view_state::{MODE_KEY, ViewMode, ViewState};
pub use workspace::{DocumentView, MARKDOWN_VIEW, Workspace};
