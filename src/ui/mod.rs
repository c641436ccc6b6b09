//! Terminal front end.
//!
//! [`TerminalShell`] implements [`crate::app::Shell`] with ratatui. The
//! drawing and input translation work on a plain [`ViewState`] so they can be
//! exercised without a real terminal.

mod input;
mod layout;
mod overlays;
mod preview;
mod terminal;
mod view;

pub use input::{dropped_path, translate_event};
pub use layout::{OPEN_BUTTON, Panes, SAVE_BUTTON, centered_popup_rect, contains};
pub use overlays::{DialogKind, Modal, PathPrompt, confirm_close_key};
pub use preview::{PreviewContent, href_at};
pub use terminal::{TerminalOptions, TerminalShell};
pub use view::ViewState;
