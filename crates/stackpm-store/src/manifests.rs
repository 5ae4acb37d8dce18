use crate::io::{FsIo, ManifestIo};
use crate::layout::ProjectLayout;
use crate::StoreError;
use stackpm_schema::{
    lockfile_scaffold, validate_name, validate_version, Lockfile, PkgName, PkgSpec, PkgVersion,
    Specfile, SPECFILE_SCAFFOLD,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Names actually stripped by [`ManifestStore::remove_dependencies`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoveReport {
    pub specfile: Vec<PkgName>,
    pub lockfile: Vec<PkgName>,
}

/// Reads and edits the two coupled manifests of one project.
///
/// Every operation reads the whole file, edits the line model, and writes the
/// whole file back. Operations touching both files are not atomic: the
/// specfile is written first and a failure writing the lockfile leaves the
/// two out of step.
pub struct ManifestStore<I = FsIo> {
    layout: ProjectLayout,
    io: I,
}

impl ManifestStore<FsIo> {
    pub fn open(layout: ProjectLayout) -> Self {
        Self::new(layout, FsIo)
    }
}

impl<I: ManifestIo> ManifestStore<I> {
    pub fn new(layout: ProjectLayout, io: I) -> Self {
        Self { layout, io }
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    pub fn io(&self) -> &I {
        &self.io
    }

    /// Write both scaffolds when the specfile is missing. Returns whether
    /// anything was created. A lockfile left without its specfile is
    /// replaced, since its pins would name packages the fresh specfile
    /// does not list.
    pub fn ensure_initialized(&self, resolver: &str) -> Result<bool, StoreError> {
        let spec_path = self.layout.specfile();
        if self.io.exists(&spec_path)? {
            return Ok(false);
        }
        self.io.write(&spec_path, SPECFILE_SCAFFOLD)?;

        let lock_path = self.layout.lockfile();
        if self.io.exists(&lock_path)? {
            warn!(
                "{} exists without {}; replacing it with a fresh scaffold",
                lock_path.display(),
                spec_path.display()
            );
        }
        self.io.write(&lock_path, &lockfile_scaffold(resolver))?;
        debug!("scaffolded project in {}", self.layout.root().display());
        Ok(true)
    }

    /// The specfile, or an empty one when the file does not exist yet.
    pub fn load_specfile(&self) -> Result<Specfile, StoreError> {
        Ok(self
            .io
            .read(&self.layout.specfile())?
            .map(|text| Specfile::parse(&text))
            .unwrap_or_default())
    }

    /// The lockfile, or an empty one when the file does not exist yet.
    pub fn load_lockfile(&self) -> Result<Lockfile, StoreError> {
        Ok(self
            .io
            .read(&self.layout.lockfile())?
            .map(|text| Lockfile::parse(&text))
            .unwrap_or_default())
    }

    /// Direct dependencies; specs are always empty.
    pub fn list_specfile(&self) -> Result<BTreeMap<PkgName, PkgSpec>, StoreError> {
        Ok(self
            .load_specfile()?
            .dependencies()
            .into_iter()
            .map(|name| (name, PkgSpec::default()))
            .collect())
    }

    /// Pinned extra dependencies.
    pub fn list_lockfile(&self) -> Result<BTreeMap<PkgName, PkgVersion>, StoreError> {
        Ok(self
            .load_lockfile()?
            .extra_deps()
            .into_iter()
            .map(|dep| (dep.name, dep.version))
            .collect())
    }

    pub fn append_dependency(&self, name: &str) -> Result<(), StoreError> {
        validate_name(name)?;
        let path = self.layout.specfile();
        let text = self
            .io
            .read(&path)?
            .ok_or_else(|| StoreError::NotInitialized(path.clone()))?;
        let mut spec = Specfile::parse(&text);
        spec.append_dependency(name);
        self.io.write(&path, &spec.to_string())
    }

    /// Append `- name-version` to the `extra-deps` block, adding the block
    /// marker when it is missing. An earlier pin of the same name is dropped
    /// so each name appears once.
    pub fn append_extra_dep(&self, name: &str, version: &str) -> Result<(), StoreError> {
        validate_name(name)?;
        validate_version(version)?;
        let path = self.layout.lockfile();
        let text = self
            .io
            .read(&path)?
            .ok_or_else(|| StoreError::NotInitialized(path.clone()))?;
        let mut lock = Lockfile::parse(&text);
        if lock.remove_extra_dep(name) {
            debug!("replacing existing pin for {name}");
        }
        lock.append_extra_dep(name, version)?;
        self.io.write(&path, &lock.to_string())
    }

    /// Strip `names` from both manifests: lockfile entries for names pinned
    /// there, specfile lines for every name. Unknown names are ignored and
    /// missing files are left alone.
    pub fn remove_dependencies(
        &self,
        names: &BTreeSet<PkgName>,
    ) -> Result<RemoveReport, StoreError> {
        let spec_path = self.layout.specfile();
        let lock_path = self.layout.lockfile();
        let spec_text = self.io.read(&spec_path)?;
        let lock_text = self.io.read(&lock_path)?;

        let mut report = RemoveReport::default();

        let mut lock = lock_text.as_deref().map(Lockfile::parse);
        if let Some(lock) = lock.as_mut() {
            let pinned: BTreeSet<PkgName> =
                lock.extra_deps().into_iter().map(|dep| dep.name).collect();
            for name in names.intersection(&pinned) {
                if lock.remove_extra_dep(name) {
                    report.lockfile.push(name.clone());
                }
            }
        }

        let mut spec = spec_text.as_deref().map(Specfile::parse);
        if let Some(spec) = spec.as_mut() {
            for name in names {
                if spec.remove_dependency(name) {
                    report.specfile.push(name.clone());
                }
            }
        }

        if let Some(spec) = spec {
            self.io.write(&spec_path, &spec.to_string())?;
        }
        if let Some(lock) = lock {
            self.io.write(&lock_path, &lock.to_string())?;
        }
        Ok(report)
    }
}
