//! Package metadata resolution for stackpm.
//!
//! This crate turns package names and free-text queries into normalized
//! `PkgInfo` records. A `PackageIndex` answers full-text searches and serves
//! each package's cabal file; `HttpIndex` implements it against Hoogle and
//! Hackage. `Resolver` combines the two, fetching metadata for several hits
//! at once with a bounded number of worker threads.

pub mod cabal;
pub mod config;
pub mod http;
pub mod mock;
pub mod resolver;

pub use cabal::CabalFields;
pub use config::ResolverConfig;
pub use http::HttpIndex;
pub use mock::StaticIndex;
pub use resolver::Resolver;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sent as `User-Agent` on every outbound request.
pub const USER_AGENT: &str = concat!("stackpm/", env!("CARGO_PKG_VERSION"));

/// Prefix the search service puts in front of package names in `item`.
pub const PACKAGE_ITEM_PREFIX: &str = "package ";

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("network error: {0}")]
    Http(String),
    #[error("network error: malformed search response: {0}")]
    Serialization(String),
    #[error("package not found: {0}")]
    NotFound(String),
    #[error("resolver config error: {0}")]
    Config(String),
    #[error("resolver config I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One result row from the search service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchHit {
    #[serde(default)]
    pub item: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub docs: String,
}

impl SearchHit {
    /// Bare package name, or `None` when the hit is not a package.
    pub fn package_name(&self) -> Option<&str> {
        self.item
            .strip_prefix(PACKAGE_ITEM_PREFIX)
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Source of search hits and per-package metadata documents.
pub trait PackageIndex: Send + Sync {
    /// Package-typed hits for `query`, in upstream relevance order.
    fn search(&self, query: &str) -> Result<Vec<SearchHit>, RemoteError>;

    /// The cabal file for `name`, located relative to the hit's `url`.
    fn fetch_metadata(&self, hit_url: &str, name: &str) -> Result<String, RemoteError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_name_strips_prefix() {
        let hit = SearchHit {
            item: "package text-show".to_owned(),
            ..SearchHit::default()
        };
        assert_eq!(hit.package_name(), Some("text-show"));
    }

    #[test]
    fn non_package_items_have_no_name() {
        let hit = SearchHit {
            item: "module Data.Aeson".to_owned(),
            ..SearchHit::default()
        };
        assert_eq!(hit.package_name(), None);
        assert_eq!(SearchHit::default().package_name(), None);
    }

    #[test]
    fn hit_deserializes_with_extra_and_missing_fields() {
        let hits: Vec<SearchHit> = serde_json::from_str(
            r#"[{"item":"package aeson","url":"https://hackage.haskell.org/package/aeson","type":"","module":{}}]"#,
        )
        .unwrap();
        assert_eq!(hits[0].package_name(), Some("aeson"));
        assert!(hits[0].docs.is_empty());
    }
}
