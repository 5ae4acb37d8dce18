use crate::document::TextDocument;
use crate::types::PkgName;
use std::fmt;

/// Indentation and separator that introduce a dependency line in the
/// `build-depends` list.
pub const DEPENDENCY_PREFIX: &str = "    , ";

pub fn dependency_line(name: &str) -> String {
    format!("{DEPENDENCY_PREFIX}{name}")
}

/// The cabal specfile, kept as text.
///
/// Only lines starting with [`DEPENDENCY_PREFIX`] are interpreted; every other
/// line is carried through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Specfile {
    doc: TextDocument,
}

impl Specfile {
    pub fn parse(text: &str) -> Self {
        Self {
            doc: TextDocument::parse(text),
        }
    }

    /// Dependency names in file order.
    pub fn dependencies(&self) -> Vec<PkgName> {
        self.doc
            .texts()
            .filter_map(dependency_name)
            .map(PkgName::from)
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.doc.texts().any(|t| dependency_name(t) == Some(name))
    }

    pub fn append_dependency(&mut self, name: &str) {
        self.doc.push(&dependency_line(name));
    }

    /// Strip every dependency line for `name`. Returns whether anything changed.
    pub fn remove_dependency(&mut self, name: &str) -> bool {
        self.doc
            .remove_where(|_, t| dependency_name(t) == Some(name))
            > 0
    }
}

impl fmt::Display for Specfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.doc.render())
    }
}

fn dependency_name(line: &str) -> Option<&str> {
    let name = line.strip_prefix(DEPENDENCY_PREFIX)?.trim_end();
    (!name.is_empty()).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scaffold::SPECFILE_SCAFFOLD;

    #[test]
    fn lists_comma_prefixed_lines_in_order() {
        let mut text = SPECFILE_SCAFFOLD.to_owned();
        text.push_str("    , text\n    , aeson\n");
        let spec = Specfile::parse(&text);
        assert_eq!(spec.dependencies(), vec![PkgName::from("text"), PkgName::from("aeson")]);
    }

    #[test]
    fn ignores_other_indentation() {
        let spec = Specfile::parse("  , two-spaces\n      , six-spaces\n\t, tab\n");
        assert!(spec.dependencies().is_empty());
    }

    #[test]
    fn trailing_whitespace_is_not_part_of_name() {
        let spec = Specfile::parse("    , lens  \r\n");
        assert_eq!(spec.dependencies(), vec![PkgName::from("lens")]);
        assert!(spec.contains("lens"));
    }

    #[test]
    fn append_then_render() {
        let mut spec = Specfile::parse(SPECFILE_SCAFFOLD);
        spec.append_dependency("aeson");
        assert_eq!(spec.to_string(), format!("{SPECFILE_SCAFFOLD}    , aeson\n"));
    }

    #[test]
    fn remove_keeps_other_lines_byte_for_byte() {
        let text = "-- hand edited\nbuild-depends:\n    base\n    , foo\n    , bar\n";
        let mut spec = Specfile::parse(text);
        assert!(spec.remove_dependency("foo"));
        assert_eq!(
            spec.to_string(),
            "-- hand edited\nbuild-depends:\n    base\n    , bar\n"
        );
    }

    #[test]
    fn remove_matches_whole_name_only() {
        let mut spec = Specfile::parse("    , foo-bar\n    , foo\n");
        assert!(spec.remove_dependency("foo"));
        assert_eq!(spec.dependencies(), vec![PkgName::from("foo-bar")]);
    }

    #[test]
    fn remove_absent_name_is_noop() {
        let mut spec = Specfile::parse(SPECFILE_SCAFFOLD);
        assert!(!spec.remove_dependency("missing"));
        assert_eq!(spec.to_string(), SPECFILE_SCAFFOLD);
    }
}
