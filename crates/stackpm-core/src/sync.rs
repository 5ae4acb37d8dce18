use crate::CoreError;
use serde::Serialize;
use stackpm_remote::{PackageIndex, Resolver};
use stackpm_schema::{
    validate_name, validate_version, PkgInfo, PkgName, PkgSpec, PkgVersion, DEFAULT_RESOLVER,
};
use stackpm_store::{ManifestIo, ManifestStore, RemoveReport};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Description text Hoogle shows for packages outside the Stackage snapshot.
pub const NOT_CURATED_MARKER: &str = "Not on Stackage";

/// Whether `info` belongs to the curated snapshot named by the lockfile's
/// `resolver`. Packages outside it must be pinned under `extra-deps`.
///
/// This is a text heuristic on the search description; a change in the
/// upstream wording silently flips every package to curated.
pub fn is_curated(info: &PkgInfo) -> bool {
    !info.description.contains(NOT_CURATED_MARKER)
}

/// What [`add`] changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AddReport {
    /// Names appended to the specfile.
    pub added: Vec<PkgName>,
    /// Extra dependencies written to the lockfile.
    pub pinned: BTreeMap<PkgName, PkgVersion>,
    /// Requested names that were already listed in the specfile.
    pub unchanged: Vec<PkgName>,
}

/// Add `requested` to the project, pinning packages outside the curated set.
///
/// Every name is resolved before any manifest is touched, so a failed lookup
/// leaves both files as they were (apart from a freshly written scaffold).
/// A non-empty spec overrides the resolved version of an extra dependency.
pub fn add<I: ManifestIo, B: PackageIndex>(
    store: &ManifestStore<I>,
    resolver: &Resolver<B>,
    requested: &BTreeMap<PkgName, PkgSpec>,
    project_name: Option<&str>,
) -> Result<AddReport, CoreError> {
    if let Some(project) = project_name {
        debug!("ignoring project name '{project}'; the scaffold package is always 'project'");
    }
    for (name, spec) in requested {
        validate_name(name)?;
        if !spec.is_empty() {
            validate_version(spec)?;
        }
    }

    if store.ensure_initialized(DEFAULT_RESOLVER)? {
        info!("initialized project in {}", store.layout().root().display());
    }

    let names: Vec<PkgName> = requested.keys().cloned().collect();
    let infos = resolver.info_many(&names)?;

    let mut pins = BTreeMap::new();
    for ((name, spec), info) in requested.iter().zip(&infos) {
        if is_curated(info) {
            debug!("{name} is in the curated set");
            continue;
        }
        let version = if spec.is_empty() {
            info.version.as_str()
        } else {
            spec.as_str()
        };
        validate_version(version)?;
        pins.insert(name.clone(), PkgVersion::from(version));
    }

    let specfile = store.load_specfile()?;
    let lockfile = store.load_lockfile()?;
    let mut report = AddReport::default();
    for name in requested.keys() {
        if let Some(version) = pins.get(name) {
            if lockfile.version_of(name).as_ref() == Some(version) {
                debug!("{name}-{version} already pinned");
            } else {
                store.append_extra_dep(name, version)?;
                report.pinned.insert(name.clone(), version.clone());
            }
        }
        if specfile.contains(name) {
            debug!("{name} already listed");
            report.unchanged.push(name.clone());
        } else {
            store.append_dependency(name)?;
            report.added.push(name.clone());
        }
    }

    info!(
        "added {} package(s), wrote {} extra-deps pin(s)",
        report.added.len(),
        report.pinned.len()
    );
    Ok(report)
}

/// Strip `names` from both manifests. Names found in neither are ignored.
pub fn remove<I: ManifestIo>(
    store: &ManifestStore<I>,
    names: &BTreeSet<PkgName>,
) -> Result<RemoveReport, CoreError> {
    let report = store.remove_dependencies(names)?;
    for name in names {
        if !report.specfile.contains(name) && !report.lockfile.contains(name) {
            debug!("{name} is not a dependency; skipping");
        }
    }
    info!(
        "removed {} package(s), dropped {} extra-deps pin(s)",
        report.specfile.len(),
        report.lockfile.len()
    );
    Ok(report)
}
