use crate::RemoteError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_SEARCH_URL: &str = "https://hoogle.haskell.org/";
pub const DEFAULT_MAX_PARALLEL: usize = 4;
/// Environment variable overriding [`ResolverConfig::search_url`].
pub const SEARCH_URL_ENV: &str = "STACKPM_SEARCH_URL";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResolverConfig {
    pub search_url: String,
    /// Upper bound on concurrent metadata fetches.
    pub max_parallel: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_owned(),
            max_parallel: DEFAULT_MAX_PARALLEL,
        }
    }
}

impl ResolverConfig {
    pub fn new(search_url: &str) -> Self {
        Self {
            search_url: search_url.to_owned(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_max_parallel(mut self, max_parallel: usize) -> Self {
        self.max_parallel = max_parallel.max(1);
        self
    }

    /// Load `~/.config/stackpm/config.toml`, falling back to defaults when
    /// the file does not exist.
    pub fn load_default() -> Result<Self, RemoteError> {
        let path = default_config_path()?;
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load(path: &Path) -> Result<Self, RemoteError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| RemoteError::Config(format!("invalid config {}: {e}", path.display())))?;
        let max_parallel = config.max_parallel;
        Ok(config.with_max_parallel(max_parallel))
    }

    /// Apply [`SEARCH_URL_ENV`] when it is set and non-empty.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(SEARCH_URL_ENV) {
            if !url.trim().is_empty() {
                self.search_url = url.trim().to_owned();
            }
        }
        self
    }
}

fn default_config_path() -> Result<PathBuf, RemoteError> {
    let home = std::env::var("HOME").map_err(|_| RemoteError::Config("HOME not set".to_owned()))?;
    Ok(PathBuf::from(home).join(".config/stackpm/config.toml"))
}
