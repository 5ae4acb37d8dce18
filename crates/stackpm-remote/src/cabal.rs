use std::collections::BTreeMap;

/// `key: value` fields of a cabal file.
///
/// Keys are lowercased and the first occurrence of a key wins, so top-level
/// package fields take precedence over same-named fields further down.
/// Continuation lines, section headers and comments are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CabalFields {
    fields: BTreeMap<String, String>,
}

impl CabalFields {
    pub fn parse(doc: &str) -> Self {
        let mut fields = BTreeMap::new();
        for line in doc.lines() {
            match parse_field(line) {
                Some((key, value)) => {
                    fields
                        .entry(key.to_ascii_lowercase())
                        .or_insert_with(|| value.to_owned());
                }
                None => tracing::trace!("skipping cabal line '{line}'"),
            }
        }
        Self { fields }
    }

    /// Value of `key`, or `""` when absent.
    pub fn get(&self, key: &str) -> &str {
        self.fields.get(key).map_or("", String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn parse_field(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    let key = key.trim_start();
    let value = value.trim();
    if key.is_empty() || key.contains(char::is_whitespace) || value.is_empty() {
        return None;
    }
    Some((key, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT_SHOW: &str = "\
cabal-version:       1.12
name:                text-show
version:             3.9.2
synopsis:            Efficient conversion of values into Text
license:             BSD3
author:              Ryan Scott
maintainer:          Ryan Scott <ryan.gl.scott@gmail.com>
homepage:            https://github.com/RyanGlScott/text-show
bug-reports:         https://github.com/RyanGlScott/text-show/issues
description:
  @text-show@ offers a replacement for the @Show@ typeclass.
  .
  see: the documentation

-- comment: not a field
library
  build-depends:       base >= 4.5 && < 5
  version:             9.9.9
";

    #[test]
    fn reads_known_fields() {
        let fields = CabalFields::parse(TEXT_SHOW);
        assert_eq!(fields.get("version"), "3.9.2");
        assert_eq!(fields.get("license"), "BSD3");
        assert_eq!(fields.get("author"), "Ryan Scott");
        assert_eq!(fields.get("homepage"), "https://github.com/RyanGlScott/text-show");
        assert_eq!(
            fields.get("bug-reports"),
            "https://github.com/RyanGlScott/text-show/issues"
        );
    }

    #[test]
    fn first_occurrence_wins() {
        let fields = CabalFields::parse(TEXT_SHOW);
        assert_eq!(fields.get("version"), "3.9.2");
    }

    #[test]
    fn indented_fields_are_read() {
        let fields = CabalFields::parse(TEXT_SHOW);
        assert_eq!(fields.get("build-depends"), "base >= 4.5 && < 5");
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let fields = CabalFields::parse("description:\n  .\n-- comment: x\nno colon here\n: value\n");
        assert!(fields.is_empty());
        assert_eq!(fields.get("description"), "");
    }

    #[test]
    fn keys_are_case_insensitive() {
        let fields = CabalFields::parse("Name: Foo\nVersion: 1.0\nLicense: MIT\n");
        assert_eq!(fields.get("version"), "1.0");
        assert_eq!(fields.get("license"), "MIT");
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn missing_key_is_empty() {
        assert_eq!(CabalFields::parse("").get("author"), "");
    }
}
