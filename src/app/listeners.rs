//! UI event listeners.
//!
//! Plain callbacks that translate toolkit events into controller calls.

use crate::app::App;
use crate::app::shell::{ClickTarget, Shell};
use crate::document::FileSystem;

/// Toolbar buttons and preview links.
pub fn on_click<S: Shell, F: FileSystem>(app: &mut App<S, F>, target: &ClickTarget) {
    match target {
        ClickTarget::ToolbarOpen => app.open_file_dialog(),
        ClickTarget::ToolbarSave => app.save_open_file(),
        ClickTarget::Link(href) => app.follow_link(href),
    }
}

/// The editor changed: re-render from its current value.
pub fn on_text_change<S: Shell, F: FileSystem>(app: &mut App<S, F>) {
    let text = app.shell().editor_value();
    app.set_viewer_markdown(&text);
}
