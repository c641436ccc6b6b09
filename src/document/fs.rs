use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

/// The file operations the document protocol needs.
pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;

    /// Read the whole file.
    ///
    /// # Errors
    /// Returns the underlying I/O error when the file cannot be read.
    fn read_all(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Replace the file's contents with `bytes`.
    ///
    /// # Errors
    /// Returns the underlying I/O error when the file cannot be written.
    fn write_all(&mut self, path: &Path, bytes: &[u8]) -> io::Result<()>;
}

/// The real file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_all(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write_all(&mut self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        std::fs::write(path, bytes)
    }
}

/// In-memory file system with per-path read/write failures.
#[derive(Debug, Default, Clone)]
pub struct MemoryFileSystem {
    files: HashMap<PathBuf, Vec<u8>>,
    unreadable: HashSet<PathBuf>,
    read_only: HashSet<PathBuf>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        self.files.insert(path.into(), contents.into());
        self
    }

    /// Reads of `path` fail with `PermissionDenied` (the file still "exists").
    pub fn deny_reads(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.files.entry(path.clone()).or_default();
        self.unreadable.insert(path);
        self
    }

    /// Writes to `path` fail with `PermissionDenied`.
    pub fn deny_writes(mut self, path: impl Into<PathBuf>) -> Self {
        self.read_only.insert(path.into());
        self
    }

    pub fn contents(&self, path: &Path) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }
}

impl FileSystem for MemoryFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn read_all(&self, path: &Path) -> io::Result<Vec<u8>> {
        if self.unreadable.contains(path) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read denied"));
        }
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }

    fn write_all(&mut self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        if self.read_only.contains(path) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "write denied"));
        }
        self.files.insert(path.to_path_buf(), bytes.to_vec());
        Ok(())
    }
}
