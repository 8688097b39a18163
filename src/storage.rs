//! File storage for uploaded images.
//!
//! Paths handed to a [`Storage`] are relative, `/`-separated names such as
//! `base_user/images/<id>.jpeg`. Saving to a name that already exists
//! replaces the file instead of picking a fresh name.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use foodie_core::{Error, Result};

/// Where uploaded files live.
pub trait Storage: Send + Sync {
    /// Write `content` at `path`, replacing any existing file, and return the
    /// stored path.
    fn save(&self, path: &str, content: &[u8]) -> Result<String>;

    /// Read a stored file. A missing file is [`Error::NotFound`].
    fn open(&self, path: &str) -> Result<Vec<u8>>;

    fn exists(&self, path: &str) -> Result<bool>;

    /// Remove a stored file. Returns false if there was nothing to remove.
    fn delete(&self, path: &str) -> Result<bool>;
}

/// Filesystem storage rooted at a media directory, with overwrite semantics.
#[derive(Debug, Clone)]
pub struct OverwriteStorage {
    root: PathBuf,
}

impl OverwriteStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a stored name under the root, refusing anything that could
    /// escape it.
    pub fn full_path(&self, path: &str) -> Result<PathBuf> {
        let rel = Path::new(path);
        let escapes = rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if path.is_empty() || escapes {
            return Err(Error::validation(format!("invalid storage path: {path:?}")));
        }
        Ok(self.root.join(rel))
    }
}

impl Storage for OverwriteStorage {
    fn save(&self, path: &str, content: &[u8]) -> Result<String> {
        let full = self.full_path(path)?;
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent)?;
        }
        // fs::write truncates, so an existing file keeps its name.
        std::fs::write(&full, content)?;
        tracing::debug!(path, bytes = content.len(), "Stored file");
        Ok(path.to_string())
    }

    fn open(&self, path: &str) -> Result<Vec<u8>> {
        let full = self.full_path(path)?;
        match std::fs::read(&full) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::not_found("file", path)),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self, path: &str) -> Result<bool> {
        Ok(self.full_path(path)?.is_file())
    }

    fn delete(&self, path: &str) -> Result<bool> {
        let full = self.full_path(path)?;
        match std::fs::remove_file(&full) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
