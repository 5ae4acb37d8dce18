use crate::{PackageIndex, RemoteError, SearchHit, PACKAGE_ITEM_PREFIX};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory [`PackageIndex`] with canned packages.
///
/// A search returns, in registration order, every hit whose item text
/// contains the query, ignoring case. Fetches and searches are counted.
#[derive(Debug, Default)]
pub struct StaticIndex {
    hits: Vec<SearchHit>,
    documents: BTreeMap<String, String>,
    failing_fetches: BTreeSet<String>,
    fail_search: bool,
    searches: AtomicUsize,
    fetches: AtomicUsize,
}

impl StaticIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a package whose hit URL is `https://hackage.example/package/<name>`.
    #[must_use]
    pub fn with_package(mut self, name: &str, docs: &str, cabal: &str) -> Self {
        self.hits.push(SearchHit {
            item: format!("{PACKAGE_ITEM_PREFIX}{name}"),
            url: format!("https://hackage.example/package/{name}"),
            docs: docs.to_owned(),
        });
        self.documents.insert(name.to_owned(), cabal.to_owned());
        self
    }

    #[must_use]
    pub fn with_hit(mut self, hit: SearchHit) -> Self {
        self.hits.push(hit);
        self
    }

    #[must_use]
    pub fn fail_fetch(mut self, name: &str) -> Self {
        self.failing_fetches.insert(name.to_owned());
        self
    }

    #[must_use]
    pub fn fail_search(mut self) -> Self {
        self.fail_search = true;
        self
    }

    pub fn search_count(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl PackageIndex for StaticIndex {
    fn search(&self, query: &str) -> Result<Vec<SearchHit>, RemoteError> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        if self.fail_search {
            return Err(RemoteError::Http("search service unavailable".to_owned()));
        }
        let query = query.to_lowercase();
        Ok(self
            .hits
            .iter()
            .filter(|hit| hit.item.to_lowercase().contains(&query))
            .cloned()
            .collect())
    }

    fn fetch_metadata(&self, hit_url: &str, name: &str) -> Result<String, RemoteError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.failing_fetches.contains(name) {
            return Err(RemoteError::Http(format!("HTTP 500 for {hit_url}")));
        }
        self.documents
            .get(name)
            .cloned()
            .ok_or_else(|| RemoteError::Http(format!("HTTP 404 for {hit_url}")))
    }
}
