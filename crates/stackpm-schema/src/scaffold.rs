/// Snapshot written into a freshly scaffolded lockfile.
pub const DEFAULT_RESOLVER: &str = "lts-16.10";

/// Specfile written when a project has none. One executable target depending
/// on `base`; added packages are appended below the `build-depends` header.
pub const SPECFILE_SCAFFOLD: &str = "name:                project
version:             0.0.0
build-type:          Simple
cabal-version:       >=1.10

executable main
  hs-source-dirs:      .
  main-is:             main.hs
  default-language:    Haskell2010
  build-depends:       
    base >= 4.7 && < 5
";

/// Lockfile companion to [`SPECFILE_SCAFFOLD`].
///
/// `system-ghc: true` lets stack use an installed GHC when it matches the
/// snapshot instead of downloading a toolchain.
pub fn lockfile_scaffold(resolver: &str) -> String {
    format!("resolver: {resolver}\nsystem-ghc: true\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lockfile, Specfile};

    #[test]
    fn specfile_scaffold_has_no_dependencies() {
        let spec = Specfile::parse(SPECFILE_SCAFFOLD);
        assert!(spec.dependencies().is_empty());
        assert!(SPECFILE_SCAFFOLD.contains("base >= 4.7 && < 5"));
        assert!(SPECFILE_SCAFFOLD.contains("default-language:    Haskell2010"));
    }

    #[test]
    fn lockfile_scaffold_names_snapshot() {
        let lock = Lockfile::parse(&lockfile_scaffold(DEFAULT_RESOLVER));
        assert_eq!(lock.resolver(), Some("lts-16.10"));
        assert_eq!(lock.system_ghc(), Some(true));
        assert!(lock.extra_deps().is_empty());
        assert!(!lock.has_extra_deps_marker());
    }
}
