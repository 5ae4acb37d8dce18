use crate::StoreError;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// Whole-file access to the manifests.
///
/// A missing file reads as `None`; every other failure is an error.
pub trait ManifestIo: Send + Sync {
    fn read(&self, path: &Path) -> Result<Option<String>, StoreError>;

    fn write(&self, path: &Path, content: &str) -> Result<(), StoreError>;

    fn exists(&self, path: &Path) -> Result<bool, StoreError> {
        Ok(self.read(path)?.is_some())
    }
}

/// Filesystem-backed manifest access. Writes go through a temporary file in
/// the same directory and are renamed into place.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsIo;

impl ManifestIo for FsIo {
    fn read(&self, path: &Path) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    fn write(&self, path: &Path, content: &str) -> Result<(), StoreError> {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let existing = match fs::metadata(path) {
            Ok(meta) => Some(meta.permissions()),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(StoreError::io(path, e)),
        };
        let Some(permissions) = existing else {
            tracing::debug!("creating {}", path.display());
            return fs::write(path, content).map_err(|e| StoreError::io(path, e));
        };

        tracing::debug!("rewriting {} ({} bytes)", path.display(), content.len());
        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| StoreError::io(path, e))?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| StoreError::io(path, e))?;
        tmp.as_file()
            .set_permissions(permissions)
            .map_err(|e| StoreError::io(path, e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| StoreError::io(path, e))?;
        tmp.persist(path).map_err(|e| StoreError::io(path, e.error))?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> Result<bool, StoreError> {
        path.try_exists().map_err(|e| StoreError::io(path, e))
    }
}

/// In-memory manifest access for tests and dry runs.
///
/// Individual paths can be made to fail on write to exercise partial updates.
#[derive(Debug, Default)]
pub struct MemoryIo {
    files: Mutex<BTreeMap<PathBuf, String>>,
    failing: Mutex<BTreeSet<PathBuf>>,
}

impl MemoryIo {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, content: &str) -> Self {
        self.lock_files().insert(path.into(), content.to_owned());
        self
    }

    pub fn contents(&self, path: &Path) -> Option<String> {
        self.lock_files().get(path).cloned()
    }

    pub fn fail_writes_to(&self, path: impl Into<PathBuf>) {
        self.failing
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(path.into());
    }

    fn lock_files(&self) -> std::sync::MutexGuard<'_, BTreeMap<PathBuf, String>> {
        self.files
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl ManifestIo for MemoryIo {
    fn read(&self, path: &Path) -> Result<Option<String>, StoreError> {
        Ok(self.contents(path))
    }

    fn write(&self, path: &Path, content: &str) -> Result<(), StoreError> {
        let failing = self
            .failing
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .contains(path);
        if failing {
            return Err(StoreError::io(
                path,
                std::io::Error::new(ErrorKind::PermissionDenied, "write refused"),
            ));
        }
        self.lock_files()
            .insert(path.to_path_buf(), content.to_owned());
        Ok(())
    }
}
