use crate::{PackageIndex, RemoteError, ResolverConfig, SearchHit, USER_AGENT};
use std::io::Read;

/// HTTP-backed package index.
///
/// Searches go to a Hoogle-compatible endpoint:
/// - `GET <search_url>?mode=json&format=text&hoogle=<query> is:package`
///   returning a JSON array of `{item, url, docs}` objects
///
/// Metadata is read from the package's Hackage page:
/// - `GET <hit url>/src/<name>.cabal`
///
/// Requests block until they complete; there is no retry.
pub struct HttpIndex {
    config: ResolverConfig,
    agent: ureq::Agent,
}

impl HttpIndex {
    pub fn new(config: ResolverConfig) -> Self {
        let agent = ureq::Agent::new_with_defaults();
        Self { config, agent }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    fn do_get(&self, url: &str, query: &[(&str, &str)]) -> Result<Vec<u8>, RemoteError> {
        let mut req = self.agent.get(url).header("User-Agent", USER_AGENT);
        for (key, value) in query {
            req = req.query(*key, *value);
        }
        let resp = match req.call() {
            Ok(r) => r,
            Err(ureq::Error::StatusCode(code)) => {
                return Err(RemoteError::Http(format!("HTTP {code} for {url}")));
            }
            Err(e) => {
                return Err(RemoteError::Http(format!("{url}: {e}")));
            }
        };

        let code = resp.status().as_u16();
        if code >= 400 {
            return Err(RemoteError::Http(format!("HTTP {code} for {url}")));
        }

        let mut reader = resp.into_body().into_reader();
        let mut body = Vec::new();
        reader
            .read_to_end(&mut body)
            .map_err(|e| RemoteError::Http(format!("{url}: {e}")))?;
        Ok(body)
    }
}

/// Location of a package's cabal file below its Hackage page.
pub fn metadata_url(hit_url: &str, name: &str) -> String {
    format!("{}/src/{name}.cabal", hit_url.trim_end_matches('/'))
}

impl PackageIndex for HttpIndex {
    fn search(&self, query: &str) -> Result<Vec<SearchHit>, RemoteError> {
        let hoogle = format!("{query} is:package");
        tracing::debug!("GET {} hoogle={hoogle}", self.config.search_url);
        let body = self.do_get(
            &self.config.search_url,
            &[("mode", "json"), ("format", "text"), ("hoogle", &hoogle)],
        )?;
        serde_json::from_slice(&body).map_err(|e| RemoteError::Serialization(e.to_string()))
    }

    fn fetch_metadata(&self, hit_url: &str, name: &str) -> Result<String, RemoteError> {
        let url = metadata_url(hit_url, name);
        tracing::debug!("GET {url}");
        let body = self.do_get(&url, &[])?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
