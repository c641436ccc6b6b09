//! Document state and the edit/load/save synchronization protocol.
//!
//! [`DocumentState`] is the single source of truth for what the editor holds
//! versus what is on disk. All disk access goes through the [`FileSystem`]
//! seam so the protocol can be exercised without touching real files.

mod fs;
mod state;

pub use fs::{FileSystem, MemoryFileSystem, OsFileSystem};
pub use state::{
    CloseChoice, CloseGate, DocumentError, DocumentState, OpenOutcome, PromptError,
    with_markdown_extension,
};
