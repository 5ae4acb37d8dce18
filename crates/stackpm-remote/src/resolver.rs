use crate::cabal::CabalFields;
use crate::{PackageIndex, RemoteError, SearchHit};
use stackpm_schema::{PkgInfo, PkgName};
use tracing::debug;

/// Resolves names and queries to [`PkgInfo`] records.
///
/// Each record combines one search hit with the fields of that package's
/// cabal file. Independent fetches run on scoped threads, at most
/// `max_parallel` at a time; results keep upstream order and the first
/// failure (in that order) aborts the whole call.
pub struct Resolver<B> {
    index: B,
    max_parallel: usize,
}

impl<B: PackageIndex> Resolver<B> {
    pub fn new(index: B, max_parallel: usize) -> Self {
        Self {
            index,
            max_parallel: max_parallel.max(1),
        }
    }

    pub fn index(&self) -> &B {
        &self.index
    }

    /// Every package hit for `query`, in relevance order.
    pub fn search(&self, query: &str) -> Result<Vec<PkgInfo>, RemoteError> {
        let hits = self.index.search(query)?;
        let candidates: Vec<(&SearchHit, &str)> = hits
            .iter()
            .filter_map(|hit| match hit.package_name() {
                Some(name) => Some((hit, name)),
                None => {
                    debug!("ignoring non-package hit '{}'", hit.item);
                    None
                }
            })
            .collect();
        fan_out(&candidates, self.max_parallel, |&(hit, name)| {
            self.resolve_hit(hit, name)
        })
    }

    /// Exactly the package called `name`.
    ///
    /// Hits are matched by exact name rather than trusting the first result,
    /// and the record is checked again after parsing.
    pub fn info(&self, name: &str) -> Result<PkgInfo, RemoteError> {
        let hits = self.index.search(name)?;
        let hit = hits
            .iter()
            .find(|hit| hit.package_name() == Some(name))
            .ok_or_else(|| RemoteError::NotFound(name.to_owned()))?;
        let info = self.resolve_hit(hit, name)?;
        if info.name != name {
            return Err(RemoteError::NotFound(name.to_owned()));
        }
        Ok(info)
    }

    /// [`info`](Self::info) for several names at once, in input order.
    pub fn info_many(&self, names: &[PkgName]) -> Result<Vec<PkgInfo>, RemoteError> {
        fan_out(names, self.max_parallel, |name| self.info(name))
    }

    fn resolve_hit(&self, hit: &SearchHit, name: &str) -> Result<PkgInfo, RemoteError> {
        let doc = self.index.fetch_metadata(&hit.url, name)?;
        let cabal = CabalFields::parse(&doc);
        Ok(PkgInfo {
            name: PkgName::from(name),
            description: hit.docs.replace('\n', ""),
            version: cabal.get("version").to_owned(),
            homepage_url: hit.url.clone(),
            source_code_url: cabal.get("homepage").to_owned(),
            bug_tracker_url: cabal.get("bug-reports").to_owned(),
            author: cabal.get("author").to_owned(),
            license: cabal.get("license").to_owned(),
        })
    }
}

fn fan_out<T, R, F>(items: &[T], limit: usize, f: F) -> Result<Vec<R>, RemoteError>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> Result<R, RemoteError> + Sync,
{
    let f = &f;
    let mut out = Vec::with_capacity(items.len());
    for batch in items.chunks(limit.max(1)) {
        let results: Vec<Result<R, RemoteError>> = std::thread::scope(|s| {
            let handles: Vec<_> = batch.iter().map(|item| s.spawn(move || f(item))).collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|p| std::panic::resume_unwind(p)))
                .collect()
        });
        for result in results {
            out.push(result?);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::StaticIndex;

    fn index() -> StaticIndex {
        StaticIndex::new()
            .with_package(
                "aeson",
                "Fast JSON parsing and encoding",
                "name: aeson\nversion: 2.0.3.0\nlicense: BSD3\nauthor: Bryan O'Sullivan\n",
            )
            .with_package(
                "aeson-pretty",
                "JSON pretty-printing library\nand command-line tool.",
                "name: aeson-pretty\nversion: 0.8.9\nhomepage: https://github.com/informatikr/aeson-pretty\nbug-reports: https://github.com/informatikr/aeson-pretty/issues\n",
            )
    }

    #[test]
    fn search_keeps_relevance_order() {
        let resolver = Resolver::new(index(), 1);
        let names: Vec<_> = resolver
            .search("aeson")
            .unwrap()
            .into_iter()
            .map(|i| i.name.into_inner())
            .collect();
        assert_eq!(names, vec!["aeson", "aeson-pretty"]);
    }

    #[test]
    fn search_in_parallel_matches_sequential() {
        let sequential = Resolver::new(index(), 1).search("aeson").unwrap();
        let parallel = Resolver::new(index(), 8).search("aeson").unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn search_without_matches_is_empty() {
        let resolver = Resolver::new(index(), 4);
        assert!(resolver.search("zzz").unwrap().is_empty());
    }

    #[test]
    fn search_skips_non_package_hits() {
        let idx = index().with_hit(SearchHit {
            item: "module Data.Aeson".to_owned(),
            url: "https://hackage.example/package/aeson/docs/Data-Aeson.html".to_owned(),
            docs: String::new(),
        });
        let resolver = Resolver::new(idx, 4);
        assert_eq!(resolver.search("aeson").unwrap().len(), 2);
    }

    #[test]
    fn info_maps_metadata_fields() {
        let resolver = Resolver::new(index(), 4);
        let info = resolver.info("aeson-pretty").unwrap();
        assert_eq!(info.name, "aeson-pretty");
        assert_eq!(info.version, "0.8.9");
        assert_eq!(info.description, "JSON pretty-printing libraryand command-line tool.");
        assert_eq!(info.homepage_url, "https://hackage.example/package/aeson-pretty");
        assert_eq!(info.source_code_url, "https://github.com/informatikr/aeson-pretty");
        assert_eq!(
            info.bug_tracker_url,
            "https://github.com/informatikr/aeson-pretty/issues"
        );
        assert!(info.author.is_empty());
        assert!(info.license.is_empty());
    }

    #[test]
    fn info_requires_exact_name() {
        let resolver = Resolver::new(index(), 4);
        // upstream ranks "aeson" first for this query
        let err = resolver.info("aeso").unwrap_err();
        assert!(matches!(err, RemoteError::NotFound(ref n) if n == "aeso"));
    }

    #[test]
    fn info_fetches_only_the_matching_hit() {
        let resolver = Resolver::new(index(), 4);
        resolver.info("aeson-pretty").unwrap();
        assert_eq!(resolver.index().fetch_count(), 1);
    }

    #[test]
    fn fetch_failure_aborts_search() {
        let resolver = Resolver::new(index().fail_fetch("aeson-pretty"), 4);
        assert!(matches!(
            resolver.search("aeson").unwrap_err(),
            RemoteError::Http(_)
        ));
    }

    #[test]
    fn search_failure_aborts_info() {
        let resolver = Resolver::new(index().fail_search(), 4);
        assert!(matches!(
            resolver.info("aeson").unwrap_err(),
            RemoteError::Http(_)
        ));
    }

    #[test]
    fn info_many_keeps_input_order_and_fails_on_any_miss() {
        let resolver = Resolver::new(index(), 2);
        let infos = resolver
            .info_many(&[PkgName::from("aeson-pretty"), PkgName::from("aeson")])
            .unwrap();
        assert_eq!(infos[0].name, "aeson-pretty");
        assert_eq!(infos[1].name, "aeson");

        let err = resolver
            .info_many(&[PkgName::from("aeson"), PkgName::from("missing")])
            .unwrap_err();
        assert!(matches!(err, RemoteError::NotFound(_)));
    }

    #[test]
    fn fan_out_reports_first_error_in_order() {
        let items = [1, 2, 3, 4, 5];
        let err = fan_out(&items, 3, |&n| {
            if n >= 2 {
                Err(RemoteError::Http(format!("item {n}")))
            } else {
                Ok(n)
            }
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "network error: item 2");
    }
}
