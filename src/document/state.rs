use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::FileSystem;
use crate::render::Renderer;

/// File I/O failures reported by [`DocumentState`].
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The confirmation prompt could not be shown or answered.
#[derive(Debug, Error)]
#[error("close confirmation failed: {0}")]
pub struct PromptError(pub String);

/// Answer to the "unsaved changes" prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseChoice {
    SaveAndClose,
    CloseWithoutSaving,
    Cancel,
}

/// What the caller of [`DocumentState::request_close`] must do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseGate {
    /// Close right away.
    Allow,
    /// Save, then close whatever the save outcome.
    SaveThenAllow,
    /// Keep running. Also the answer when the prompt itself fails, on the
    /// quit path as much as before opening another file.
    Refuse,
}

/// Result of a successful [`DocumentState::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// The file existed and its contents replaced the source text.
    Loaded,
    /// The path does not exist yet; the current text becomes a new file there.
    NewFile,
}

/// Source text, its rendered HTML, the backing path and the unsaved flag.
#[derive(Debug, Clone, Default)]
pub struct DocumentState {
    renderer: Renderer,
    source: String,
    rendered_html: String,
    file_path: Option<PathBuf>,
    dirty: bool,
}

impl DocumentState {
    /// An empty, clean document with no path.
    pub fn new(renderer: Renderer) -> Self {
        Self {
            renderer,
            ..Self::default()
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Always `render(source)` as of the last edit or load.
    pub fn rendered_html(&self) -> &str {
        &self.rendered_html
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Replace the source text, mark dirty and re-render.
    pub fn set_source_text(&mut self, text: &str) {
        text.clone_into(&mut self.source);
        self.dirty = true;
        self.rerender();
    }

    /// Open `path`.
    ///
    /// A missing path keeps the current text and becomes a dirty new document
    /// at that path. An existing file replaces the text and leaves the
    /// document clean.
    ///
    /// # Errors
    /// Returns [`DocumentError::Read`] when the file exists but cannot be
    /// read. Nothing changes in that case.
    pub fn open(&mut self, path: &Path, fs: &impl FileSystem) -> Result<OpenOutcome, DocumentError> {
        if !fs.exists(path) {
            self.file_path = Some(path.to_path_buf());
            self.dirty = true;
            return Ok(OpenOutcome::NewFile);
        }

        let bytes = fs.read_all(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.source = String::from_utf8_lossy(&bytes).into_owned();
        self.file_path = Some(path.to_path_buf());
        self.dirty = false;
        self.rerender();
        Ok(OpenOutcome::Loaded)
    }

    /// Write the source text verbatim to `path`.
    ///
    /// # Errors
    /// Returns [`DocumentError::Write`] on failure; the dirty flag is left as
    /// it was.
    pub fn save(&mut self, path: &Path, fs: &mut impl FileSystem) -> Result<(), DocumentError> {
        fs.write_all(path, self.source.as_bytes())
            .map_err(|source| DocumentError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        self.dirty = false;
        Ok(())
    }

    /// Save to a newly chosen path and adopt it as the document's path.
    ///
    /// `.md` is appended when `path` has no extension. Returns the path that
    /// was written.
    ///
    /// # Errors
    /// Returns [`DocumentError::Write`] on failure; neither the path nor the
    /// dirty flag change.
    pub fn save_as(&mut self, path: &Path, fs: &mut impl FileSystem) -> Result<PathBuf, DocumentError> {
        let target = with_markdown_extension(path);
        self.save(&target, fs)?;
        self.file_path = Some(target.clone());
        Ok(target)
    }

    /// Decide whether the document may close.
    ///
    /// `prompt` is only called when there are unsaved changes.
    pub fn request_close(
        &self,
        prompt: impl FnOnce() -> Result<CloseChoice, PromptError>,
    ) -> CloseGate {
        if !self.dirty {
            return CloseGate::Allow;
        }
        match prompt() {
            Ok(CloseChoice::SaveAndClose) => CloseGate::SaveThenAllow,
            Ok(CloseChoice::CloseWithoutSaving) => CloseGate::Allow,
            Ok(CloseChoice::Cancel) => CloseGate::Refuse,
            Err(err) => {
                tracing::error!(%err, "could not ask about unsaved changes, staying open");
                CloseGate::Refuse
            }
        }
    }

    fn rerender(&mut self) {
        self.rendered_html = self.renderer.render(&self.source);
    }
}

/// `path` with `.md` appended when it has no extension.
pub fn with_markdown_extension(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        return path.to_path_buf();
    }
    let mut name = OsString::from(path.as_os_str());
    name.push(".md");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MemoryFileSystem;
    use crate::render::render;
    use std::cell::Cell;

    fn loaded(path: &str, text: &str) -> (DocumentState, MemoryFileSystem) {
        let fs = MemoryFileSystem::new().with_file(path, text);
        let mut doc = DocumentState::default();
        doc.open(Path::new(path), &fs).unwrap();
        (doc, fs)
    }

    #[test]
    fn test_new_document_is_empty_and_clean() {
        let doc = DocumentState::default();
        assert_eq!(doc.source(), "");
        assert_eq!(doc.rendered_html(), "");
        assert!(doc.file_path().is_none());
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_set_source_text_marks_dirty_and_renders() {
        let mut doc = DocumentState::default();
        doc.set_source_text("# Hi");
        assert!(doc.is_dirty());
        assert_eq!(doc.rendered_html(), render("# Hi"));
    }

    #[test]
    fn test_rendered_html_tracks_every_edit() {
        let mut doc = DocumentState::default();
        doc.set_source_text("one");
        doc.set_source_text("two");
        assert_eq!(doc.rendered_html(), render("two"));
        assert!(!doc.rendered_html().contains("one"));
    }

    #[test]
    fn test_open_existing_loads_clean() {
        let (doc, _) = loaded("notes.md", "- item\n");
        assert_eq!(doc.source(), "- item\n");
        assert_eq!(doc.rendered_html(), render("- item\n"));
        assert_eq!(doc.file_path(), Some(Path::new("notes.md")));
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_edit_after_open_marks_dirty() {
        let (mut doc, _) = loaded("notes.md", "text");
        doc.set_source_text("text!");
        assert!(doc.is_dirty());
    }

    #[test]
    fn test_open_nonexistent_path_is_dirty_new_file() {
        let fs = MemoryFileSystem::new();
        let mut doc = DocumentState::default();
        doc.set_source_text("draft");
        let html = doc.rendered_html().to_string();
        doc.save(Path::new("elsewhere.md"), &mut MemoryFileSystem::new())
            .unwrap();
        assert!(!doc.is_dirty());

        let outcome = doc.open(Path::new("fresh.md"), &fs).unwrap();
        assert_eq!(outcome, OpenOutcome::NewFile);
        assert!(doc.is_dirty());
        assert_eq!(doc.source(), "draft");
        assert_eq!(doc.rendered_html(), html);
        assert_eq!(doc.file_path(), Some(Path::new("fresh.md")));
    }

    #[test]
    fn test_open_unreadable_file_changes_nothing() {
        let fs = MemoryFileSystem::new().deny_reads("locked.md");
        let mut doc = DocumentState::default();
        doc.set_source_text("keep me");

        let err = doc.open(Path::new("locked.md"), &fs).unwrap_err();
        assert!(matches!(err, DocumentError::Read { .. }));
        assert_eq!(doc.source(), "keep me");
        assert!(doc.is_dirty());
        assert!(doc.file_path().is_none());
    }

    #[test]
    fn test_open_invalid_utf8_is_lossy() {
        let fs = MemoryFileSystem::new().with_file("bad.md", vec![b'a', 0xff, b'b']);
        let mut doc = DocumentState::default();
        doc.open(Path::new("bad.md"), &fs).unwrap();
        assert_eq!(doc.source(), "a\u{fffd}b");
    }

    #[test]
    fn test_save_writes_verbatim_and_clears_dirty() {
        let mut fs = MemoryFileSystem::new();
        let mut doc = DocumentState::default();
        doc.set_source_text("no newline at end");
        doc.save(Path::new("out.md"), &mut fs).unwrap();
        assert!(!doc.is_dirty());
        assert_eq!(
            fs.contents(Path::new("out.md")),
            Some("no newline at end".as_bytes())
        );
    }

    #[test]
    fn test_failed_save_keeps_dirty_flag() {
        let mut fs = MemoryFileSystem::new().deny_writes("/readonly/x.md");
        let mut doc = DocumentState::default();
        doc.set_source_text("unsaved");
        let err = doc.save(Path::new("/readonly/x.md"), &mut fs).unwrap_err();
        assert!(matches!(err, DocumentError::Write { .. }));
        assert!(doc.is_dirty());
    }

    #[test]
    fn test_failed_save_on_clean_document_stays_clean() {
        let (mut doc, fs) = loaded("notes.md", "text");
        let mut fs = fs.deny_writes("notes.md");
        assert!(doc.save(Path::new("notes.md"), &mut fs).is_err());
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_save_as_appends_extension_and_adopts_path() {
        let mut fs = MemoryFileSystem::new();
        let mut doc = DocumentState::default();
        doc.set_source_text("body");
        let written = doc.save_as(Path::new("draft"), &mut fs).unwrap();
        assert_eq!(written, PathBuf::from("draft.md"));
        assert_eq!(doc.file_path(), Some(Path::new("draft.md")));
        assert!(fs.contents(Path::new("draft.md")).is_some());
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_save_as_keeps_existing_extension() {
        assert_eq!(
            with_markdown_extension(Path::new("README.markdown")),
            PathBuf::from("README.markdown")
        );
        assert_eq!(
            with_markdown_extension(Path::new("dir/notes")),
            PathBuf::from("dir/notes.md")
        );
    }

    #[test]
    fn test_failed_save_as_does_not_adopt_path() {
        let mut fs = MemoryFileSystem::new().deny_writes("draft.md");
        let mut doc = DocumentState::default();
        doc.set_source_text("body");
        assert!(doc.save_as(Path::new("draft"), &mut fs).is_err());
        assert!(doc.file_path().is_none());
        assert!(doc.is_dirty());
    }

    #[test]
    fn test_clean_close_never_prompts() {
        let asked = Cell::new(false);
        let doc = DocumentState::default();
        let gate = doc.request_close(|| {
            asked.set(true);
            Ok(CloseChoice::Cancel)
        });
        assert_eq!(gate, CloseGate::Allow);
        assert!(!asked.get());
    }

    #[test]
    fn test_clean_loaded_close_never_prompts() {
        let (doc, _) = loaded("notes.md", "text");
        let gate = doc.request_close(|| panic!("prompt must not be shown"));
        assert_eq!(gate, CloseGate::Allow);
    }

    #[test]
    fn test_dirty_close_maps_each_choice() {
        let mut doc = DocumentState::default();
        doc.set_source_text("x");
        assert_eq!(
            doc.request_close(|| Ok(CloseChoice::SaveAndClose)),
            CloseGate::SaveThenAllow
        );
        assert_eq!(
            doc.request_close(|| Ok(CloseChoice::CloseWithoutSaving)),
            CloseGate::Allow
        );
        assert_eq!(doc.request_close(|| Ok(CloseChoice::Cancel)), CloseGate::Refuse);
    }

    #[test]
    fn test_prompt_failure_refuses_close() {
        let mut doc = DocumentState::default();
        doc.set_source_text("x");
        let gate = doc.request_close(|| Err(PromptError("no terminal".to_string())));
        assert_eq!(gate, CloseGate::Refuse);
    }

    #[test]
    fn test_safe_renderer_is_used_for_rendering() {
        let mut doc = DocumentState::new(Renderer::new().with_safe_html(true));
        doc.set_source_text("<b>raw</b>");
        assert!(!doc.rendered_html().contains("<b>"));
    }
}
