//! Editing pane text storage.
//!
//! A rope-backed buffer with a single cursor. The buffer knows nothing about
//! files or dirty tracking; it backs the editor surface and reports every
//! mutation through its return values so the shell can emit change events.

mod buffer;

pub use buffer::{Direction, EditorBuffer};
