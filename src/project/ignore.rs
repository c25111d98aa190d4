//! Ignore-list parsing and matching.

use crate::error::{ErrorExt, Result};
use glob::{MatchOptions, Pattern};
use std::path::Path;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A single ignore-list entry.
#[derive(Debug, Clone)]
struct IgnoreEntry {
    /// Normalized relative path fragment, `/`-separated
    fragment: String,
    /// Compiled pattern, only for fragments with wildcard characters
    pattern: Option<Pattern>,
}

impl IgnoreEntry {
    fn new(raw: &str) -> Self {
        let fragment = normalize(raw);
        let pattern = fragment
            .contains(['*', '?'])
            .then(|| Pattern::new(&escape_brackets(&fragment)).ok())
            .flatten();
        Self { fragment, pattern }
    }

    fn matches(&self, relative: &str) -> bool {
        if self.fragment == relative {
            return true;
        }
        self.pattern
            .as_ref()
            .is_some_and(|p| p.matches_with(relative, MATCH_OPTIONS))
    }
}

/// Ordered list of path fragments excluded from every archive.
///
/// Fragments are relative to the project root. Plain fragments match one
/// exact path; fragments containing `*` or `?` are matched as glob patterns
/// that do not cross `/`. Brackets are always literal.
#[derive(Debug, Clone, Default)]
pub struct IgnoreList {
    entries: Vec<IgnoreEntry>,
}

impl IgnoreList {
    /// Creates an empty ignore list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a fragment. Blank fragments are dropped.
    pub fn push(&mut self, fragment: &str) {
        let entry = IgnoreEntry::new(fragment);
        if !entry.fragment.is_empty() {
            self.entries.push(entry);
        }
    }

    /// Appends every entry of an ignore file.
    ///
    /// Lines are trimmed; blank lines and lines starting with `#` are skipped.
    pub fn extend_from_file(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path).fs_context("reading ignore file", path)?;
        self.extend_from_str(&content);
        Ok(())
    }

    /// Appends every entry of ignore-file content.
    pub fn extend_from_str(&mut self, content: &str) {
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            self.push(line);
        }
    }

    /// The normalized fragments, in insertion order.
    pub fn fragments(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.fragment.as_str())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `relative` (a path relative to the project root) is ignored.
    pub fn matches(&self, relative: &Path) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        let relative = to_slash(relative);
        self.entries.iter().any(|e| e.matches(&relative))
    }
}

/// Joins path components with `/` so matching is platform independent.
fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Makes `[` and `]` match themselves in a glob pattern.
fn escape_brackets(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        match c {
            '[' => escaped.push_str("[[]"),
            ']' => escaped.push_str("[]]"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Strips `./` prefixes and trailing separators, and unifies separators.
fn normalize(raw: &str) -> String {
    let mut fragment = raw.trim().replace('\\', "/");
    while let Some(rest) = fragment.strip_prefix("./") {
        fragment = rest.to_string();
    }
    while fragment.len() > 1 && fragment.ends_with('/') {
        fragment.pop();
    }
    fragment
}
