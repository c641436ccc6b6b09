use anyhow::{Context, Result};

use crate::app::shell::{Shell, Shortcut, UiEvent};
use crate::app::{App, AppStatus, listeners};
use crate::document::FileSystem;

impl<S: Shell, F: FileSystem> App<S, F> {
    /// Handle one event.
    ///
    /// Shortcuts come first, then the listeners, then whatever the UI left
    /// unhandled (close/quit requests and dropped files).
    pub fn dispatch(&mut self, event: UiEvent) -> AppStatus {
        match event {
            UiEvent::Shortcut(Shortcut::DumpHtml) => self.dump_html(),
            UiEvent::Shortcut(Shortcut::Open) => self.open_file_dialog(),
            UiEvent::Shortcut(Shortcut::Save) => self.save_open_file(),
            UiEvent::Shortcut(Shortcut::Quit) => return self.try_close(),

            UiEvent::Click(target) => listeners::on_click(self, &target),
            UiEvent::TextChanged => listeners::on_text_change(self),

            UiEvent::CloseRequested | UiEvent::QuitRequested => return self.try_close(),
            UiEvent::DropFile(path) => self.open_file(&path),
        }
        AppStatus::Continue
    }

    /// Run the event loop until the document is allowed to close.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing or reading events fails.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.shell.draw().context("Failed to draw frame")?;
            let event = self
                .shell
                .next_event(self.tick)
                .context("Failed to read input event")?;
            if let Some(event) = event {
                tracing::trace!(?event, "dispatch");
                if self.dispatch(event) == AppStatus::Exit {
                    return Ok(());
                }
            }
            self.poll_dialogs();
        }
    }
}
