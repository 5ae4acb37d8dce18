//! Sync engine and backend contract for stackpm.
//!
//! This crate ties the manifest store, the metadata resolver and the build
//! tool together behind `LanguageBackend`, the contract a multi-ecosystem
//! front end drives. `StackBackend` implements it for Haskell Stack projects;
//! the `sync` module holds the add/remove logic that keeps `project.cabal`
//! and `stack.yaml` consistent.

pub mod backend;
pub mod sync;

pub use backend::{LanguageBackend, Quirk, StackBackend, BACKEND_NAME};
pub use sync::{is_curated, AddReport, NOT_CURATED_MARKER};

use stackpm_remote::RemoteError;
use stackpm_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("manifest error: {0}")]
    Manifest(#[from] stackpm_schema::ManifestError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error("runtime error: {0}")]
    Runtime(#[from] stackpm_runtime::RuntimeError),
    #[error("unsupported operation: {0}")]
    Unsupported(String),
}

/// Coarse classification of a [`CoreError`] for hosts choosing exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    NotFound,
    Manifest,
    Unsupported,
    Tool,
    Other,
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Manifest(_) | Self::Store(_) => ErrorKind::Manifest,
            Self::Remote(RemoteError::Http(_) | RemoteError::Serialization(_)) => {
                ErrorKind::Network
            }
            Self::Remote(RemoteError::NotFound(_)) => ErrorKind::NotFound,
            Self::Remote(_) => ErrorKind::Other,
            Self::Runtime(_) => ErrorKind::Tool,
            Self::Unsupported(_) => ErrorKind::Unsupported,
        }
    }
}
