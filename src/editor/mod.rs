//! Text buffer for panes in source mode.
//!
//! A rope-backed buffer with a char-indexed cursor. Content-changing
//! operations report whether anything changed so the host can raise
//! edit notifications only for real edits.

mod buffer;

pub use buffer::{Cursor, Direction, EditorBuffer};
