//! Package identifiers, metadata records, and manifest text model for stackpm.
//!
//! This crate defines the schema layer: string newtypes for package names,
//! specs and versions, the normalized `PkgInfo` record, and line-oriented
//! models of the two coupled manifests (`Specfile` for `project.cabal`,
//! `Lockfile` for `stack.yaml`) that edit dependency lines while leaving every
//! other line byte-for-byte intact.

mod document;
pub mod info;
pub mod lockfile;
pub mod scaffold;
pub mod specfile;
pub mod types;
pub mod validate;

pub use info::PkgInfo;
pub use lockfile::{extra_dep_line, split_versioned, ExtraDep, Lockfile, EXTRA_DEPS_MARKER};
pub use scaffold::{lockfile_scaffold, DEFAULT_RESOLVER, SPECFILE_SCAFFOLD};
pub use specfile::{dependency_line, Specfile, DEPENDENCY_PREFIX};
pub use types::{PkgName, PkgSpec, PkgVersion};
pub use validate::{validate_name, validate_version};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("invalid package name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },
    #[error("invalid package version '{0}', expected dotted numbers such as 1.2.3")]
    InvalidVersion(String),
    #[error("cannot edit inline extra-deps value '{0}'; write it as a block list")]
    InlineExtraDeps(String),
}
