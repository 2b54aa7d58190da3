use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// Reads stylesheet sources by path.
///
/// Injected into the parser so that hosts can serve stylesheets from
/// bundles or memory.
pub trait SourceLoader: Send + Sync {
    /// Read the whole source at `path`.
    ///
    /// # Errors
    ///
    /// Returns the underlying error if the source cannot be read.
    fn load(&self, path: &Path) -> io::Result<String>;
}

/// Reads from the file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader;

impl SourceLoader for FsLoader {
    fn load(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// Serves sources from a map, for tests and embedded stylesheets.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    files: HashMap<PathBuf, String>,
}

impl MemoryLoader {
    /// An empty loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a source.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>, source: &str) -> Self {
        let _ = self.files.insert(path.into(), source.to_string());
        self
    }
}

impl SourceLoader for MemoryLoader {
    fn load(&self, path: &Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no stylesheet registered at {}", path.display()),
            )
        })
    }
}
