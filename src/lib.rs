// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. document::DocumentState)
    clippy::module_name_repetitions
)]

//! # Markpad
//!
//! A terminal Markdown editor with a live HTML preview.
//!
//! Every edit re-renders the whole buffer to HTML. The HTML is patched so it
//! stays well-formed for an XHTML-style consumer and shown, highlighted, next
//! to the editor.
//!
//! ## Architecture
//!
//! - A [`document::DocumentState`] owns the source text, the rendered HTML,
//!   the file path and the dirty flag
//! - The [`app::App`] controller drives it from UI events and pushes results
//!   back through the [`app::Shell`] trait
//! - [`ui::TerminalShell`] is the ratatui implementation of that trait
//!
//! ## Modules
//!
//! - [`app`]: Controller, listeners and event loop
//! - [`config`]: Flag-file configuration
//! - [`document`]: Document state, close protocol and file access
//! - [`editor`]: Rope-backed editing buffer
//! - [`highlight`]: Preview syntax highlighting
//! - [`render`]: Markdown to patched HTML
//! - [`ui`]: Terminal front end

pub mod app;
pub mod config;
pub mod document;
pub mod editor;
pub mod highlight;
pub mod render;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, AppStatus, Shell, UiEvent};
    pub use crate::document::{DocumentState, FileSystem, OsFileSystem};
    pub use crate::render::Renderer;
    pub use crate::ui::TerminalShell;
}
