//! The controller and its event plumbing.
//!
//! - [`App`]: owns the document, the UI shell and the file system
//! - [`listeners`]: click and text-change callbacks
//! - [`App::dispatch`] / [`App::run`]: the event loop
//! - [`shell`]: the interface every front end implements

mod controller;
mod event_loop;
pub mod listeners;
pub mod shell;

pub use controller::{OPEN_FILTERS, SAVE_FILTERS, is_followable_link};
pub use shell::{
    ClickTarget, DialogHandle, DialogPoll, DialogReply, FileFilter, Shell, Shortcut, UiEvent,
    dialog_channel,
};

use std::time::Duration;

use crate::document::{DocumentState, FileSystem, OsFileSystem};
use crate::render::Renderer;

/// Whether the event loop keeps going after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppStatus {
    Continue,
    /// The document may close; leave the loop
    Exit,
}

/// The controller. Constructed once at startup and handed to the event loop.
pub struct App<S: Shell, F: FileSystem = OsFileSystem> {
    document: DocumentState,
    shell: S,
    fs: F,
    /// Open dialog shown but not answered yet
    pending_open: Option<DialogHandle>,
    /// Unsaved marker as last pushed to the shell
    marker_shown: bool,
    tick: Duration,
}

impl<S: Shell, F: FileSystem> App<S, F> {
    pub fn new(shell: S, fs: F) -> Self {
        Self {
            document: DocumentState::default(),
            shell,
            fs,
            pending_open: None,
            marker_shown: false,
            tick: Duration::from_millis(250),
        }
    }

    /// Use `renderer` for every preview update.
    pub fn with_renderer(mut self, renderer: Renderer) -> Self {
        self.document = DocumentState::new(renderer);
        self
    }

    /// How long the event loop waits for input before polling dialogs again.
    pub const fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub const fn document(&self) -> &DocumentState {
        &self.document
    }

    pub const fn shell(&self) -> &S {
        &self.shell
    }

    pub const fn shell_mut(&mut self) -> &mut S {
        &mut self.shell
    }

    pub const fn file_system(&self) -> &F {
        &self.fs
    }

    /// Whether an open dialog is waiting for an answer.
    pub const fn open_dialog_pending(&self) -> bool {
        self.pending_open.is_some()
    }
}
