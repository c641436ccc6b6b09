use std::path::Path;

use crate::app::shell::{DialogPoll, FileFilter, Shell};
use crate::app::{App, AppStatus};
use crate::document::{CloseGate, DocumentError, FileSystem, OpenOutcome};

/// Filters offered by the open dialog.
pub const OPEN_FILTERS: &[FileFilter] = &[
    FileFilter {
        name: "Markdown Files",
        pattern: "md;markdown",
    },
    FileFilter {
        name: "All Files",
        pattern: "*",
    },
];

/// Filters offered by the save dialog.
pub const SAVE_FILTERS: &[FileFilter] = &[FileFilter {
    name: "Markdown File",
    pattern: "md",
}];

/// Whether clicking a link with this `href` should open it.
pub fn is_followable_link(href: &str) -> bool {
    !href.is_empty() && href != "#" && !href.starts_with("javascript:")
}

impl<S: Shell, F: FileSystem> App<S, F> {
    /// Take new editor text: update the document and push the fresh HTML to
    /// the preview within the same turn.
    pub fn set_viewer_markdown(&mut self, text: &str) {
        self.document.set_source_text(text);
        self.shell.set_preview_content(self.document.rendered_html());
        self.sync_unsaved_marker();
    }

    /// Open `path`, or start a new document there when it does not exist.
    pub fn open_file(&mut self, path: &Path) {
        match self.document.open(path, &self.fs) {
            Ok(OpenOutcome::Loaded) => {
                tracing::info!(path = %path.display(), "opened file");
                self.shell.set_editor_value(self.document.source());
                self.shell.set_preview_content(self.document.rendered_html());
            }
            Ok(OpenOutcome::NewFile) => {
                tracing::info!(path = %path.display(), "path does not exist, starting a new file");
            }
            Err(err) => {
                tracing::warn!(%err, "open failed");
                self.report_io_error("Failed to load file", path, &err);
            }
        }
        self.refresh_open_file_label();
        self.sync_unsaved_marker();
    }

    /// Write the editor text to `path`.
    pub fn save_file(&mut self, path: &Path) {
        tracing::info!(path = %path.display(), "saving file");
        if let Err(err) = self.document.save(path, &mut self.fs) {
            tracing::warn!(%err, "save failed");
            self.report_io_error("Failed to save file", path, &err);
        }
        self.sync_unsaved_marker();
    }

    /// Save to the open path, or ask for one first.
    ///
    /// Asking blocks until the save dialog is answered.
    pub fn save_open_file(&mut self) {
        if let Some(path) = self.document.file_path().map(Path::to_path_buf) {
            if self.document.is_dirty() {
                self.save_file(&path);
            }
            return;
        }

        let handle = self.shell.show_save_dialog(SAVE_FILTERS);
        let shell = &mut self.shell;
        let Some(chosen) = handle.wait(|| shell.pump_dialog()) else {
            tracing::info!("no file selected for saving");
            return;
        };

        tracing::info!(path = %chosen.display(), "saving file as");
        match self.document.save_as(&chosen, &mut self.fs) {
            Ok(_) => self.refresh_open_file_label(),
            Err(err) => {
                tracing::warn!(%err, "save as failed");
                let path = crate::document::with_markdown_extension(&chosen);
                self.report_io_error("Failed to save file", &path, &err);
            }
        }
        self.sync_unsaved_marker();
    }

    /// Run the close gate.
    ///
    /// "Save and Close" closes even when the save fails.
    pub fn try_close(&mut self) -> AppStatus {
        let shell = &mut self.shell;
        match self.document.request_close(|| shell.confirm_close()) {
            CloseGate::Allow => AppStatus::Exit,
            CloseGate::SaveThenAllow => {
                self.save_open_file();
                AppStatus::Exit
            }
            CloseGate::Refuse => AppStatus::Continue,
        }
    }

    /// Show the open dialog, first asking about unsaved changes.
    ///
    /// The answer arrives later and is picked up by [`App::poll_dialogs`].
    pub fn open_file_dialog(&mut self) {
        if self.document.is_dirty() && self.try_close() == AppStatus::Continue {
            return;
        }
        self.pending_open = Some(self.shell.show_open_dialog(OPEN_FILTERS));
    }

    /// Finish a pending open dialog if it has been answered.
    pub fn poll_dialogs(&mut self) {
        let Some(handle) = &self.pending_open else {
            return;
        };
        let DialogPoll::Resolved(chosen) = handle.poll() else {
            return;
        };
        self.pending_open = None;
        match chosen {
            Some(path) => self.open_file(&path),
            None => tracing::info!("no file selected to open"),
        }
    }

    /// Log the last rendered HTML.
    pub fn dump_html(&self) {
        tracing::info!("---\n{}", self.document.rendered_html());
    }

    /// Open `href` with the platform opener unless it is a dead link.
    pub fn follow_link(&mut self, href: &str) {
        if !is_followable_link(href) {
            return;
        }
        if let Err(err) = self.shell.open_url(href) {
            tracing::warn!(%err, href, "failed to open link");
        }
    }

    fn refresh_open_file_label(&mut self) {
        if let Some(path) = self.document.file_path() {
            let label = path.display().to_string();
            self.shell.set_open_file_label(&label);
        }
    }

    fn sync_unsaved_marker(&mut self) {
        let dirty = self.document.is_dirty();
        if dirty != self.marker_shown {
            self.marker_shown = dirty;
            self.shell.set_unsaved_marker(dirty);
        }
    }

    fn report_io_error(&mut self, title: &str, path: &Path, err: &DocumentError) {
        let detail = std::error::Error::source(err).map_or_else(|| err.to_string(), ToString::to_string);
        self.shell
            .show_error(title, &format!("{title}: {}\n{detail}", path.display()));
    }
}
