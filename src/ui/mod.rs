//! Terminal UI components.
//!
//! - [`render`]: Tab bar, source editor, preview and footer bars
//! - [`style`]: Colors for rendered markdown
//! - settings overlay drawn over everything while the panel is open

pub mod style;

mod overlays;
mod render;
mod status;

pub use overlays::settings_popup_rect;
pub use render::{line_number_width, preview_content_width, render};
pub use status::format_remaining;

pub const PREVIEW_LEFT_PADDING: u16 = 2;

#[cfg(test)]
mod tests;
