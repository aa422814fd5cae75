use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::error::Result;

/// Text storage used for the collection cache.
///
/// `read_text` returns `Ok(None)` when the target does not exist; writes
/// replace the whole target.
pub trait Storage: Send + Sync {
    fn read_text(&self, path: &Path) -> Result<Option<String>>;

    fn write_text(&self, path: &Path, text: &str) -> Result<()>;
}

/// Local filesystem storage
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStorage;

impl Storage for FsStorage {
    fn read_text(&self, path: &Path) -> Result<Option<String>> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} does not exist", path.display());
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn write_text(&self, path: &Path, text: &str) -> Result<()> {
        std::fs::write(path, text)?;
        Ok(())
    }
}

/// In-process storage, handy for tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let storage = Self::new();
        storage.insert(path, text);
        storage
    }

    pub fn insert(&self, path: impl Into<PathBuf>, text: impl Into<String>) {
        if let Ok(mut files) = self.files.lock() {
            files.insert(path.into(), text.into());
        }
    }

    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files
            .lock()
            .ok()
            .and_then(|files| files.get(path.as_ref()).cloned())
    }
}

impl Storage for MemoryStorage {
    fn read_text(&self, path: &Path) -> Result<Option<String>> {
        Ok(self.contents(path))
    }

    fn write_text(&self, path: &Path, text: &str) -> Result<()> {
        self.insert(path, text);
        Ok(())
    }
}
