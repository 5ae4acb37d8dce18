//! Manifest store for stackpm projects.
//!
//! This crate owns file access for the two coupled manifests: `ProjectLayout`
//! for paths rooted at an explicit project directory, the `ManifestIo` seam
//! with filesystem (`FsIo`) and in-memory (`MemoryIo`) implementations, and
//! `ManifestStore`, which scaffolds, lists, appends to, and strips dependency
//! lines from `project.cabal` and `stack.yaml`.

pub mod io;
pub mod layout;
pub mod manifests;

pub use io::{FsIo, ManifestIo, MemoryIo};
pub use layout::{ProjectLayout, LOCKFILE_NAME, PACKAGE_DIR_NAME, SPECFILE_NAME};
pub use manifests::{ManifestStore, RemoveReport};

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("manifest I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("manifest error: {0}")]
    Manifest(#[from] stackpm_schema::ManifestError),
    #[error("manifest error: {} does not exist; add a package first to scaffold the project", .0.display())]
    NotInitialized(PathBuf),
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
