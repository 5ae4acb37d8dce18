use std::path::{Path, PathBuf};

pub const SPECFILE_NAME: &str = "project.cabal";
pub const LOCKFILE_NAME: &str = "stack.yaml";
/// Build output directory stack keeps inside the project.
pub const PACKAGE_DIR_NAME: &str = ".stack-work";

/// File layout of a Stack project directory.
///
/// All paths derive from an explicit root; nothing here consults the current
/// working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[inline]
    pub fn specfile(&self) -> PathBuf {
        self.root.join(SPECFILE_NAME)
    }

    #[inline]
    pub fn lockfile(&self) -> PathBuf {
        self.root.join(LOCKFILE_NAME)
    }

    #[inline]
    pub fn package_dir(&self) -> PathBuf {
        self.root.join(PACKAGE_DIR_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_rooted() {
        let layout = ProjectLayout::new("/work/app");
        assert_eq!(layout.specfile(), PathBuf::from("/work/app/project.cabal"));
        assert_eq!(layout.lockfile(), PathBuf::from("/work/app/stack.yaml"));
        assert_eq!(layout.package_dir(), PathBuf::from("/work/app/.stack-work"));
        assert_eq!(layout.root(), Path::new("/work/app"));
    }
}
