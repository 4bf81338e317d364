/*!
 * Path filtering driven by the effective configuration
 *
 * A `FilterConfig` is the merged result of bundled defaults, an optional
 * user config file, and CLI additions. It answers two questions during a
 * walk: may traversal enter this directory, and does this file belong in
 * the output document. All matching is case-insensitive and applies to
 * base names only, never full paths.
 */

use std::collections::BTreeSet;
use std::path::Path;

use glob_match::glob_match;

/// Match a base name against an omit entry.
///
/// Entries containing `*` or `?` use shell-glob semantics; anything else
/// must match the name exactly.
pub fn name_matches(name: &str, pattern: &str) -> bool {
    if pattern.contains(['*', '?']) {
        glob_match(pattern, name)
    } else {
        name == pattern
    }
}

/// Effective filter configuration for a single run
///
/// Immutable once resolved by [`Config::resolve_filter`]; passed explicitly
/// to the scanner, never held as global state.
///
/// [`Config::resolve_filter`]: crate::config::Config::resolve_filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    /// Extensions that mark a file as source, lowercase with a single leading dot
    source_extensions: BTreeSet<String>,
    /// Exact file names included regardless of extension, lowercase
    source_filenames: BTreeSet<String>,
    /// Directory names or glob patterns pruned from traversal, lowercase
    omit_dirs: BTreeSet<String>,
    /// File names or glob patterns excluded from inclusion, lowercase
    omit_files: BTreeSet<String>,
}

impl FilterConfig {
    /// Add a source entry from a config file.
    ///
    /// Entries with a leading dot are extensions; bare entries are exact
    /// file names (`makefile`, `dockerfile`). The two rules are matched
    /// independently by [`should_include`](Self::should_include).
    pub fn add_source(&mut self, entry: &str) {
        let entry = entry.trim().to_lowercase();
        if entry.is_empty() || entry.chars().all(|c| c == '.') {
            return;
        }
        if entry.starts_with('.') {
            self.source_extensions.insert(normalize_extension(&entry));
        } else {
            self.source_filenames.insert(entry);
        }
    }

    /// Add an entry that is always treated as an extension (CLI `-a` values),
    /// normalized to lowercase with a single leading dot.
    pub fn add_extension(&mut self, entry: &str) {
        let entry = entry.trim().to_lowercase();
        if entry.is_empty() || entry.chars().all(|c| c == '.') {
            return;
        }
        self.source_extensions.insert(normalize_extension(&entry));
    }

    /// Add an omit entry, applied to directory and file names alike.
    pub fn add_omit(&mut self, entry: &str) {
        let entry = entry.trim().to_lowercase();
        if entry.is_empty() {
            return;
        }
        self.omit_dirs.insert(entry.clone());
        self.omit_files.insert(entry);
    }

    /// Whether traversal may enter the directory at `path`
    pub fn should_descend(&self, path: &Path) -> bool {
        let name = base_name(path);
        !self.omit_dirs.iter().any(|p| name_matches(&name, p))
    }

    /// Whether the file at `path` belongs in the output document
    pub fn should_include(&self, path: &Path) -> bool {
        let name = base_name(path);
        if self.omit_files.iter().any(|p| name_matches(&name, p)) {
            return false;
        }
        if self.source_filenames.contains(name.as_str()) {
            return true;
        }
        self.source_extensions
            .iter()
            .any(|ext| name.ends_with(ext.as_str()))
    }
}

/// Lowercased base name of a path, empty when the path has none
fn base_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_lowercase()
}

/// Collapse leading dots to exactly one: `..tar.gz` -> `.tar.gz`
fn normalize_extension(entry: &str) -> String {
    format!(".{}", entry.trim_start_matches('.'))
}
