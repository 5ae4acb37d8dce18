use crate::sync::{self, AddReport};
use crate::CoreError;
use serde::Serialize;
use stackpm_remote::{HttpIndex, PackageIndex, Resolver, ResolverConfig};
use stackpm_runtime::BuildTool;
use stackpm_schema::{PkgInfo, PkgName, PkgSpec, PkgVersion};
use stackpm_store::{
    FsIo, ManifestIo, ManifestStore, ProjectLayout, RemoveReport, LOCKFILE_NAME, SPECFILE_NAME,
};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use tracing::{debug, info};

pub const BACKEND_NAME: &str = "haskell-stack";

const FILENAME_PATTERNS: &[&str] = &["*.hs"];

/// Behaviour a host must account for when driving a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Quirk {
    /// `add` and `remove` leave the lockfile final; `lock` need not follow.
    AddRemoveAlsoLocks,
}

/// Contract between a multi-ecosystem front end and one language backend.
pub trait LanguageBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// File name of the manifest listing direct dependencies.
    fn specfile(&self) -> &'static str;

    /// File name of the manifest pinning exact versions.
    fn lockfile(&self) -> &'static str;

    /// Globs of source files that indicate this language.
    fn filename_patterns(&self) -> &'static [&'static str];

    fn quirks(&self) -> &'static [Quirk];

    fn search(&self, query: &str) -> Result<Vec<PkgInfo>, CoreError>;

    fn info(&self, name: &str) -> Result<PkgInfo, CoreError>;

    fn add(
        &self,
        packages: &BTreeMap<PkgName, PkgSpec>,
        project_name: Option<&str>,
    ) -> Result<AddReport, CoreError>;

    fn remove(&self, packages: &BTreeSet<PkgName>) -> Result<RemoveReport, CoreError>;

    fn list_specfile(&self) -> Result<BTreeMap<PkgName, PkgSpec>, CoreError>;

    fn list_lockfile(&self) -> Result<BTreeMap<PkgName, PkgVersion>, CoreError>;

    fn install(&self) -> Result<(), CoreError>;

    fn lock(&self) -> Result<(), CoreError>;

    /// Infer dependencies from source imports.
    fn guess(&self) -> Result<BTreeMap<PkgName, PkgSpec>, CoreError>;

    /// Directory where installed packages live.
    fn package_dir(&self) -> PathBuf;
}

/// Haskell Stack backend: `project.cabal` lists dependencies, `stack.yaml`
/// pins packages outside the resolver snapshot.
pub struct StackBackend<I = FsIo, B = HttpIndex> {
    store: ManifestStore<I>,
    resolver: Resolver<B>,
    tool: Box<dyn BuildTool>,
}

impl StackBackend {
    /// Backend for the project at `project_root`, resolving over HTTP.
    pub fn open(
        project_root: impl Into<PathBuf>,
        config: ResolverConfig,
        tool: Box<dyn BuildTool>,
    ) -> Self {
        let max_parallel = config.max_parallel;
        Self::new(
            ManifestStore::open(ProjectLayout::new(project_root)),
            Resolver::new(HttpIndex::new(config), max_parallel),
            tool,
        )
    }
}

impl<I: ManifestIo, B: PackageIndex> StackBackend<I, B> {
    pub fn new(store: ManifestStore<I>, resolver: Resolver<B>, tool: Box<dyn BuildTool>) -> Self {
        Self {
            store,
            resolver,
            tool,
        }
    }

    pub fn store(&self) -> &ManifestStore<I> {
        &self.store
    }
}

impl<I: ManifestIo, B: PackageIndex> LanguageBackend for StackBackend<I, B> {
    fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    fn specfile(&self) -> &'static str {
        SPECFILE_NAME
    }

    fn lockfile(&self) -> &'static str {
        LOCKFILE_NAME
    }

    fn filename_patterns(&self) -> &'static [&'static str] {
        FILENAME_PATTERNS
    }

    fn quirks(&self) -> &'static [Quirk] {
        &[Quirk::AddRemoveAlsoLocks]
    }

    fn search(&self, query: &str) -> Result<Vec<PkgInfo>, CoreError> {
        Ok(self.resolver.search(query)?)
    }

    fn info(&self, name: &str) -> Result<PkgInfo, CoreError> {
        Ok(self.resolver.info(name)?)
    }

    fn add(
        &self,
        packages: &BTreeMap<PkgName, PkgSpec>,
        project_name: Option<&str>,
    ) -> Result<AddReport, CoreError> {
        sync::add(&self.store, &self.resolver, packages, project_name)
    }

    fn remove(&self, packages: &BTreeSet<PkgName>) -> Result<RemoveReport, CoreError> {
        sync::remove(&self.store, packages)
    }

    fn list_specfile(&self) -> Result<BTreeMap<PkgName, PkgSpec>, CoreError> {
        Ok(self.store.list_specfile()?)
    }

    fn list_lockfile(&self) -> Result<BTreeMap<PkgName, PkgVersion>, CoreError> {
        Ok(self.store.list_lockfile()?)
    }

    fn install(&self) -> Result<(), CoreError> {
        let root = self.store.layout().root();
        info!("installing dependencies with {}", self.tool.name());
        self.tool.install_dependencies(root)?;
        Ok(())
    }

    fn lock(&self) -> Result<(), CoreError> {
        debug!("lock is a no-op; add and remove already update {LOCKFILE_NAME}");
        Ok(())
    }

    fn guess(&self) -> Result<BTreeMap<PkgName, PkgSpec>, CoreError> {
        Err(CoreError::Unsupported("guess".to_owned()))
    }

    fn package_dir(&self) -> PathBuf {
        self.store.layout().package_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackpm_remote::StaticIndex;
    use stackpm_runtime::MockTool;
    use stackpm_store::MemoryIo;
    use std::path::Path;
    use std::sync::Arc;

    fn backend(tool: Box<dyn BuildTool>) -> StackBackend<MemoryIo, StaticIndex> {
        StackBackend::new(
            ManifestStore::new(ProjectLayout::new("/work/app"), MemoryIo::new()),
            Resolver::new(StaticIndex::new(), 4),
            tool,
        )
    }

    #[test]
    fn descriptor() {
        let b = backend(Box::new(MockTool::new()));
        assert_eq!(b.name(), "haskell-stack");
        assert_eq!(b.specfile(), "project.cabal");
        assert_eq!(b.lockfile(), "stack.yaml");
        assert_eq!(b.filename_patterns(), ["*.hs"]);
        assert_eq!(b.quirks(), [Quirk::AddRemoveAlsoLocks]);
        assert_eq!(b.package_dir(), Path::new("/work/app/.stack-work"));
    }

    #[test]
    fn lock_touches_nothing() {
        let b = backend(Box::new(MockTool::new()));
        b.lock().unwrap();
        assert!(b.store().io().contents(Path::new("/work/app/stack.yaml")).is_none());
    }

    #[test]
    fn guess_is_unsupported() {
        let b = backend(Box::new(MockTool::new()));
        let err = b.guess().unwrap_err();
        assert!(matches!(err, CoreError::Unsupported(ref op) if op == "guess"));
        assert_eq!(err.kind(), crate::ErrorKind::Unsupported);
    }

    #[test]
    fn install_runs_tool_in_project_root() {
        let tool = Arc::new(MockTool::new());
        let b = backend(Box::new(Arc::clone(&tool)));
        b.install().unwrap();
        assert_eq!(tool.installs(), vec![PathBuf::from("/work/app")]);
    }

    #[test]
    fn usable_as_trait_object() {
        let b: Box<dyn LanguageBackend> = Box::new(backend(Box::new(MockTool::new())));
        assert!(b.list_specfile().unwrap().is_empty());
        assert!(b.list_lockfile().unwrap().is_empty());
    }

    #[test]
    fn quirk_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&Quirk::AddRemoveAlsoLocks).unwrap(),
            "\"add-remove-also-locks\""
        );
    }
}
