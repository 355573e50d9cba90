use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Source of raw file bytes for every loader.
///
/// `None` means the file does not exist or could not be read; loaders turn it
/// into `FileNotFound`.
pub trait FileReader {
    fn read(&self, path: &str) -> Option<Vec<u8>>;
}

impl<F> FileReader for F
where
    F: Fn(&str) -> Option<Vec<u8>>,
{
    fn read(&self, path: &str) -> Option<Vec<u8>> {
        self(path)
    }
}

/// Reads from the local filesystem, optionally below a root directory.
#[derive(Debug, Clone, Default)]
pub struct FsFileReader {
    root_path: Option<PathBuf>,
}

impl FsFileReader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves every path against `root`.
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        Self {
            root_path: Some(root.as_ref().to_path_buf()),
        }
    }

    #[inline]
    #[must_use]
    pub fn root_path(&self) -> Option<&Path> {
        self.root_path.as_deref()
    }
}

impl FileReader for FsFileReader {
    fn read(&self, path: &str) -> Option<Vec<u8>> {
        let full = match &self.root_path {
            Some(root) => root.join(path),
            None => PathBuf::from(path),
        };

        match std::fs::read(&full) {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                log::debug!("Failed to read {}: {err}", full.display());
                None
            }
        }
    }
}

/// In-memory file table keyed by the exact path string loaders ask for.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileReader {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryFileReader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), bytes.into());
    }

    #[must_use]
    pub fn with_file(mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }
}

impl FileReader for MemoryFileReader {
    fn read(&self, path: &str) -> Option<Vec<u8>> {
        self.files.get(path).cloned()
    }
}
