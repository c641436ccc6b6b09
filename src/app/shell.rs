//! The narrow interface between the controller and whatever draws the UI.

use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::time::Duration;

use anyhow::Result;

use crate::document::{CloseChoice, PromptError};

/// Keyboard shortcuts the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Log the current HTML (F2)
    DumpHtml,
    /// Open a file (Ctrl+O)
    Open,
    /// Save the current file (Ctrl+S)
    Save,
    /// Quit, asking about unsaved changes (Ctrl+Q)
    Quit,
}

/// Something the user clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickTarget {
    ToolbarOpen,
    ToolbarSave,
    /// An anchor in the preview, with its `href`
    Link(String),
}

/// Toolkit-level events delivered to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Shortcut(Shortcut),
    Click(ClickTarget),
    /// The editor's text changed
    TextChanged,
    /// q or Esc pressed while nothing has focus
    CloseRequested,
    /// The window/terminal asked the program to quit
    QuitRequested,
    /// A file path was dropped onto the window
    DropFile(PathBuf),
}

/// Entry shown in an open/save dialog's type selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileFilter {
    pub name: &'static str,
    /// Semicolon-separated extensions, `*` for anything
    pub pattern: &'static str,
}

impl FileFilter {
    pub fn matches(&self, path: &std::path::Path) -> bool {
        if self.pattern == "*" {
            return true;
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.pattern
                    .split(';')
                    .any(|pattern| pattern.eq_ignore_ascii_case(ext))
            })
    }
}

/// Sending half of a dialog completion. Dropping it unresolved counts as a
/// cancel.
#[derive(Debug)]
pub struct DialogReply(Sender<Option<PathBuf>>);

impl DialogReply {
    pub fn resolve(self, path: Option<PathBuf>) {
        // The controller may have stopped waiting; nothing to do then.
        let _ = self.0.send(path);
    }
}

/// Receiving half of a dialog completion.
#[derive(Debug)]
pub struct DialogHandle(Receiver<Option<PathBuf>>);

/// State of a [`DialogHandle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogPoll {
    Pending,
    /// The dialog finished; `None` means cancelled
    Resolved(Option<PathBuf>),
}

/// Create a connected reply/handle pair.
pub fn dialog_channel() -> (DialogReply, DialogHandle) {
    let (tx, rx) = mpsc::channel();
    (DialogReply(tx), DialogHandle(rx))
}

impl DialogHandle {
    pub fn poll(&self) -> DialogPoll {
        match self.0.try_recv() {
            Ok(path) => DialogPoll::Resolved(path),
            Err(TryRecvError::Empty) => DialogPoll::Pending,
            Err(TryRecvError::Disconnected) => DialogPoll::Resolved(None),
        }
    }

    /// Block until the dialog resolves, driving it with `pump`.
    ///
    /// `pump` processes one round of dialog input and returns `false` once
    /// its event source is gone, which resolves the dialog as cancelled.
    pub fn wait(self, mut pump: impl FnMut() -> bool) -> Option<PathBuf> {
        loop {
            if let DialogPoll::Resolved(path) = self.poll() {
                return path;
            }
            if !pump() {
                return match self.poll() {
                    DialogPoll::Resolved(path) => path,
                    DialogPoll::Pending => None,
                };
            }
        }
    }
}

/// Every capability the controller needs from the UI.
pub trait Shell {
    /// Current text of the editor surface.
    fn editor_value(&self) -> String;

    /// Replace the editor text. Must not emit [`UiEvent::TextChanged`].
    fn set_editor_value(&mut self, text: &str);

    /// Replace the preview content with `html`.
    fn set_preview_content(&mut self, html: &str);

    fn set_open_file_label(&mut self, label: &str);

    fn set_unsaved_marker(&mut self, unsaved: bool);

    /// Show a message and wait until the user dismisses it.
    fn show_error(&mut self, title: &str, message: &str);

    /// Ask what to do with unsaved changes.
    ///
    /// # Errors
    /// Returns [`PromptError`] when the prompt cannot be shown or answered.
    fn confirm_close(&mut self) -> Result<CloseChoice, PromptError>;

    fn show_open_dialog(&mut self, filters: &[FileFilter]) -> DialogHandle;

    fn show_save_dialog(&mut self, filters: &[FileFilter]) -> DialogHandle;

    /// Run one round of modal dialog input, discarding all other events.
    /// Returns `false` when no more events can arrive.
    fn pump_dialog(&mut self) -> bool;

    /// Wait up to `timeout` for the next event.
    ///
    /// # Errors
    /// Returns an error when the event source fails.
    fn next_event(&mut self, timeout: Duration) -> Result<Option<UiEvent>>;

    /// # Errors
    /// Returns an error when the frame cannot be drawn.
    fn draw(&mut self) -> Result<()>;

    /// Hand `url` to the platform opener.
    ///
    /// # Errors
    /// Returns the I/O error from launching the opener.
    fn open_url(&mut self, url: &str) -> io::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_filter_matches_extensions_case_insensitively() {
        let filter = FileFilter {
            name: "Markdown Files",
            pattern: "md;markdown",
        };
        assert!(filter.matches(Path::new("a.md")));
        assert!(filter.matches(Path::new("a.MARKDOWN")));
        assert!(!filter.matches(Path::new("a.txt")));
        assert!(!filter.matches(Path::new("noext")));
    }

    #[test]
    fn test_wildcard_filter_matches_anything() {
        let filter = FileFilter {
            name: "All Files",
            pattern: "*",
        };
        assert!(filter.matches(Path::new("noext")));
    }

    #[test]
    fn test_handle_is_pending_until_resolved() {
        let (reply, handle) = dialog_channel();
        assert_eq!(handle.poll(), DialogPoll::Pending);
        reply.resolve(Some(PathBuf::from("a.md")));
        assert_eq!(handle.poll(), DialogPoll::Resolved(Some(PathBuf::from("a.md"))));
    }

    #[test]
    fn test_dropped_reply_counts_as_cancel() {
        let (reply, handle) = dialog_channel();
        drop(reply);
        assert_eq!(handle.poll(), DialogPoll::Resolved(None));
    }

    #[test]
    fn test_wait_pumps_until_resolved() {
        let (reply, handle) = dialog_channel();
        let mut reply = Some(reply);
        let mut rounds = 0;
        let path = handle.wait(|| {
            rounds += 1;
            if rounds == 3
                && let Some(reply) = reply.take()
            {
                reply.resolve(Some(PathBuf::from("done.md")));
            }
            true
        });
        assert_eq!(path, Some(PathBuf::from("done.md")));
        assert_eq!(rounds, 3);
    }

    #[test]
    fn test_wait_stops_when_source_is_gone() {
        let (_reply, handle) = dialog_channel();
        assert_eq!(handle.wait(|| false), None);
    }
}
