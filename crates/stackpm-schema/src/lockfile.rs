use crate::document::TextDocument;
use crate::types::{PkgName, PkgVersion};
use crate::ManifestError;
use std::fmt;

/// Top-level key that opens the extra-dependency block.
pub const EXTRA_DEPS_MARKER: &str = "extra-deps:";

pub fn extra_dep_line(name: &str, version: &str) -> String {
    format!("- {name}-{version}")
}

/// A package pinned outside the resolver snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraDep {
    pub name: PkgName,
    pub version: PkgVersion,
}

/// Split a `name-version` token at its last hyphen.
///
/// The name keeps any inner hyphens: `text-show-3.9.2` is `text-show` at
/// `3.9.2`. A `@sha256:...` or `@rev:N` suffix is not part of the version.
pub fn split_versioned(token: &str) -> Option<(PkgName, PkgVersion)> {
    let base = token.split_once('@').map_or(token, |(base, _)| base);
    let (name, version) = base.rsplit_once('-')?;
    if name.is_empty() || version.is_empty() {
        return None;
    }
    Some((PkgName::from(name), PkgVersion::from(version)))
}

/// The `stack.yaml` lockfile, kept as text.
///
/// The `resolver:` and `system-ghc:` keys and the `extra-deps:` block are
/// read; everything else round-trips untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lockfile {
    doc: TextDocument,
}

struct Block {
    marker: usize,
    /// Value written on the marker line itself, comment stripped. Empty for
    /// a block sequence.
    inline: String,
    /// Line after which a new entry goes.
    insert_after: usize,
    /// Leading whitespace of the last entry, reused for new entries.
    indent: String,
    entries: Vec<usize>,
}

impl Lockfile {
    pub fn parse(text: &str) -> Self {
        Self {
            doc: TextDocument::parse(text),
        }
    }

    pub fn resolver(&self) -> Option<&str> {
        self.top_level_value("resolver")
    }

    pub fn system_ghc(&self) -> Option<bool> {
        match self.top_level_value("system-ghc")? {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    pub fn has_extra_deps_marker(&self) -> bool {
        self.block().is_some()
    }

    /// Entries of the `extra-deps` block in file order. Entries that are not
    /// `name-version` tokens (git or URL dependencies) are skipped.
    pub fn extra_deps(&self) -> Vec<ExtraDep> {
        let Some(block) = self.block() else {
            return Vec::new();
        };
        let tokens: Vec<&str> = if block.inline.is_empty() {
            block
                .entries
                .iter()
                .filter_map(|&idx| entry_token(self.doc.text(idx)))
                .collect()
        } else if let Some(items) = flow_items(&block.inline) {
            items
        } else {
            tracing::debug!("skipping inline extra-deps value '{}'", block.inline);
            Vec::new()
        };
        tokens
            .into_iter()
            .filter_map(|token| match split_versioned(token) {
                Some((name, version)) => Some(ExtraDep { name, version }),
                None => {
                    tracing::debug!("skipping extra-deps entry '{token}'");
                    None
                }
            })
            .collect()
    }

    pub fn version_of(&self, name: &str) -> Option<PkgVersion> {
        self.extra_deps()
            .into_iter()
            .find(|dep| dep.name == name)
            .map(|dep| dep.version)
    }

    /// Add `- name-version` at the end of the block, creating the block at
    /// the end of the file when it is missing.
    ///
    /// New entries take the indentation of the last existing one. An inline
    /// flow list (`extra-deps: [a-1.0]`) is rewritten as a block first, its
    /// items kept; any other inline value is refused.
    pub fn append_extra_dep(&mut self, name: &str, version: &str) -> Result<(), ManifestError> {
        let line = extra_dep_line(name, version);
        let Some(block) = self.block() else {
            self.doc.push(EXTRA_DEPS_MARKER);
            self.doc.push(&line);
            return Ok(());
        };
        if block.inline.is_empty() {
            self.doc
                .insert(block.insert_after + 1, &format!("{}{line}", block.indent));
            return Ok(());
        }

        let items: Vec<String> = flow_items(&block.inline)
            .ok_or_else(|| ManifestError::InlineExtraDeps(block.inline.clone()))?
            .into_iter()
            .map(|token| format!("- {token}"))
            .collect();
        let comment = trailing_comment(self.doc.text(block.marker)).to_owned();
        self.doc
            .replace(block.marker, &format!("{EXTRA_DEPS_MARKER}{comment}"));
        let mut at = block.marker + 1;
        for item in items.iter().chain(std::iter::once(&line)) {
            self.doc.insert(at, item);
            at += 1;
        }
        Ok(())
    }

    /// Strip the entries pinning `name`. Returns whether anything changed.
    pub fn remove_extra_dep(&mut self, name: &str) -> bool {
        let Some(block) = self.block() else {
            return false;
        };
        let pins = |token: &str| split_versioned(token).is_some_and(|(entry, _)| entry == name);

        if !block.inline.is_empty() {
            let Some(items) = flow_items(&block.inline) else {
                return false;
            };
            let kept: Vec<&str> = items.iter().copied().filter(|&t| !pins(t)).collect();
            if kept.len() == items.len() {
                return false;
            }
            let comment = trailing_comment(self.doc.text(block.marker));
            let rewritten = format!("{EXTRA_DEPS_MARKER} [{}]{comment}", kept.join(", "));
            self.doc.replace(block.marker, &rewritten);
            return true;
        }

        let doomed: Vec<usize> = block
            .entries
            .into_iter()
            .filter(|&idx| entry_token(self.doc.text(idx)).is_some_and(pins))
            .collect();
        self.doc.remove_where(|idx, _| doomed.contains(&idx)) > 0
    }

    fn top_level_value(&self, key: &str) -> Option<&str> {
        self.doc.texts().find_map(|t| {
            let (k, v) = t.split_once(':')?;
            (k == key).then(|| strip_comment(v).trim())
        })
    }

    fn block(&self) -> Option<Block> {
        let marker = (0..self.doc.len()).find(|&i| self.doc.text(i).starts_with(EXTRA_DEPS_MARKER))?;
        let inline = strip_comment(&self.doc.text(marker)[EXTRA_DEPS_MARKER.len()..]).trim();
        let mut block = Block {
            marker,
            inline: inline.to_owned(),
            insert_after: marker,
            indent: String::new(),
            entries: Vec::new(),
        };
        if !block.inline.is_empty() {
            return Some(block);
        }
        for idx in marker + 1..self.doc.len() {
            let text = self.doc.text(idx);
            let trimmed = text.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if !(text.starts_with(char::is_whitespace) || text.starts_with('-')) {
                break;
            }
            if trimmed.starts_with("- ") {
                block.entries.push(idx);
                block.indent = text[..text.len() - trimmed.len()].to_owned();
            }
            block.insert_after = idx;
        }
        Some(block)
    }
}

impl fmt::Display for Lockfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.doc.render())
    }
}

fn entry_token(line: &str) -> Option<&str> {
    let token = strip_comment(line.trim_start().strip_prefix("- ")?).trim();
    let plain = !token.is_empty()
        && !token.contains(char::is_whitespace)
        && !token.split_once('@').map_or(token, |(base, _)| base).contains(':');
    plain.then_some(token)
}

fn strip_comment(value: &str) -> &str {
    value.split_once(" #").map_or(value, |(v, _)| v)
}

/// The ` # ...` tail of a line, or an empty string.
fn trailing_comment(line: &str) -> &str {
    line.find(" #").map_or("", |at| &line[at..])
}

/// Items of a flat flow sequence such as `[foo-1.0, bar-0.2]`. Nested
/// mappings or sequences are not read.
fn flow_items(value: &str) -> Option<Vec<&str>> {
    let inner = value.strip_prefix('[')?.strip_suffix(']')?;
    if inner.contains(['[', ']', '{', '}']) {
        return None;
    }
    Some(
        inner
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scaffold::{lockfile_scaffold, DEFAULT_RESOLVER};

    fn names(lock: &Lockfile) -> Vec<String> {
        lock.extra_deps()
            .into_iter()
            .map(|d| format!("{}={}", d.name, d.version))
            .collect()
    }

    #[test]
    fn split_uses_last_hyphen() {
        let (name, version) = split_versioned("text-show-3.9.2").unwrap();
        assert_eq!(name, "text-show");
        assert_eq!(version, "3.9.2");
    }

    #[test]
    fn split_drops_hash_suffix() {
        let (name, version) = split_versioned("acme-missiles-0.3@rev:0").unwrap();
        assert_eq!(name, "acme-missiles");
        assert_eq!(version, "0.3");
    }

    #[test]
    fn split_without_hyphen_fails() {
        assert!(split_versioned("aeson").is_none());
        assert!(split_versioned("-1.0").is_none());
        assert!(split_versioned("aeson-").is_none());
    }

    #[test]
    fn append_creates_marker_once() {
        let mut lock = Lockfile::parse(&lockfile_scaffold(DEFAULT_RESOLVER));
        lock.append_extra_dep("text-show", "3.9.2").unwrap();
        lock.append_extra_dep("acme-missiles", "0.3").unwrap();
        assert_eq!(
            lock.to_string(),
            "resolver: lts-16.10\nsystem-ghc: true\nextra-deps:\n- text-show-3.9.2\n- acme-missiles-0.3\n"
        );
        assert_eq!(names(&lock), vec!["text-show=3.9.2", "acme-missiles=0.3"]);
    }

    #[test]
    fn append_inserts_inside_block_not_at_eof() {
        let mut lock = Lockfile::parse(
            "resolver: lts-16.10\nextra-deps:\n- foo-1.0\n\nflags:\n  foo:\n    fast: true\n",
        );
        lock.append_extra_dep("bar", "2.0").unwrap();
        assert_eq!(
            lock.to_string(),
            "resolver: lts-16.10\nextra-deps:\n- foo-1.0\n- bar-2.0\n\nflags:\n  foo:\n    fast: true\n"
        );
    }

    #[test]
    fn append_normalizes_inline_empty_list() {
        let mut lock = Lockfile::parse("resolver: lts-16.10\nextra-deps: []\n");
        assert!(lock.has_extra_deps_marker());
        lock.append_extra_dep("foo", "1.0").unwrap();
        assert_eq!(lock.to_string(), "resolver: lts-16.10\nextra-deps:\n- foo-1.0\n");
    }

    #[test]
    fn append_matches_indentation_of_existing_entries() {
        let mut lock = Lockfile::parse("resolver: lts-16.10\nextra-deps:\n  - foo-1.0\n");
        lock.append_extra_dep("bar", "2.0").unwrap();
        assert_eq!(
            lock.to_string(),
            "resolver: lts-16.10\nextra-deps:\n  - foo-1.0\n  - bar-2.0\n"
        );
        assert_eq!(names(&lock), vec!["foo=1.0", "bar=2.0"]);
    }

    #[test]
    fn append_keeps_marker_comment() {
        let mut lock = Lockfile::parse("extra-deps: # pinned by hand\n- foo-1.0\n");
        lock.append_extra_dep("bar", "2.0").unwrap();
        assert_eq!(
            lock.to_string(),
            "extra-deps: # pinned by hand\n- foo-1.0\n- bar-2.0\n"
        );
    }

    #[test]
    fn flow_list_entries_are_read_and_kept_on_append() {
        let mut lock = Lockfile::parse("resolver: lts-16.10\nextra-deps: [foo-1.0, baz-0.2] # old\n");
        assert_eq!(names(&lock), vec!["foo=1.0", "baz=0.2"]);
        lock.append_extra_dep("bar", "2.0").unwrap();
        assert_eq!(
            lock.to_string(),
            "resolver: lts-16.10\nextra-deps: # old\n- foo-1.0\n- baz-0.2\n- bar-2.0\n"
        );
    }

    #[test]
    fn remove_from_flow_list_rewrites_marker_line() {
        let mut lock = Lockfile::parse("extra-deps: [foo-1.0, baz-0.2]\n");
        assert!(lock.remove_extra_dep("foo"));
        assert_eq!(lock.to_string(), "extra-deps: [baz-0.2]\n");
        assert!(lock.remove_extra_dep("baz"));
        assert_eq!(lock.to_string(), "extra-deps: []\n");
        assert!(!lock.remove_extra_dep("baz"));
    }

    #[test]
    fn append_refuses_unreadable_inline_value() {
        let text = "extra-deps: [{git: https://example.com/x.git, commit: abc}]\n";
        let mut lock = Lockfile::parse(text);
        let err = lock.append_extra_dep("bar", "2.0").unwrap_err();
        assert!(matches!(err, ManifestError::InlineExtraDeps(_)));
        assert_eq!(lock.to_string(), text);
    }

    #[test]
    fn dashes_outside_block_are_not_dependencies() {
        let lock = Lockfile::parse("resolver: lts-16.10\npackages:\n- .\n- sub-dir\nextra-deps:\n- foo-1.0\n");
        assert_eq!(names(&lock), vec!["foo=1.0"]);
    }

    #[test]
    fn indented_entries_and_comments_are_read() {
        let lock = Lockfile::parse("extra-deps:\n  # pinned by hand\n  - foo-1.0 # note\n  - git: https://example.com/x.git\n");
        assert_eq!(names(&lock), vec!["foo=1.0"]);
    }

    #[test]
    fn remove_strips_only_matching_entry() {
        let mut lock = Lockfile::parse("resolver: lts-16.10\nextra-deps:\n- text-show-3.9.2\n- text-1.2\n");
        assert!(lock.remove_extra_dep("text"));
        assert_eq!(lock.to_string(), "resolver: lts-16.10\nextra-deps:\n- text-show-3.9.2\n");
        assert!(!lock.remove_extra_dep("text"));
    }

    #[test]
    fn version_of_finds_pinned_entry() {
        let lock = Lockfile::parse("extra-deps:\n- text-show-3.9.2\n");
        assert_eq!(lock.version_of("text-show"), Some(PkgVersion::from("3.9.2")));
        assert_eq!(lock.version_of("text"), None);
    }

    #[test]
    fn reads_resolver_and_system_ghc() {
        let lock = Lockfile::parse("resolver: lts-21.0 # latest\nsystem-ghc: false\n");
        assert_eq!(lock.resolver(), Some("lts-21.0"));
        assert_eq!(lock.system_ghc(), Some(false));
    }
}
