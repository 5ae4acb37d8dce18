use crate::types::PkgName;
use serde::{Deserialize, Serialize};

/// Normalized package metadata returned by `search` and `info`.
///
/// Fields the upstream services do not provide are left empty rather than
/// treated as errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PkgInfo {
    pub name: PkgName,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub homepage_url: String,
    #[serde(default)]
    pub source_code_url: String,
    #[serde(default)]
    pub bug_tracker_url: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub license: String,
}

impl PkgInfo {
    pub fn new(name: impl Into<PkgName>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
