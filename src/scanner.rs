/*!
 * Directory and file scanning functionality
 *
 * The scanner walks the target directory depth-first with sibling entries
 * sorted by name, so repeated runs over an unchanged tree yield the files
 * in the same order. Directories rejected by the filter are pruned whole;
 * listing failures skip the affected subtree with a warning and the walk
 * continues. A set of visited canonical paths keeps symlink cycles (and
 * diamond-shaped revisits) from producing duplicates.
 */

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{CbpError, Result};
use crate::filter::FilterConfig;
use crate::types::FileEntry;

/// Scanner for directory contents
pub struct Scanner {
    /// Scanner configuration
    config: Config,
    /// Effective filter for this run
    filter: FilterConfig,
}

impl Scanner {
    /// Create a new scanner
    pub fn new(config: Config, filter: FilterConfig) -> Self {
        Self { config, filter }
    }

    /// Start a walk over the target directory.
    ///
    /// Each call re-reads disk state from scratch. Fails with
    /// [`CbpError::InvalidRoot`] when the target is missing or not a
    /// directory.
    pub fn walk(&self) -> Result<Walk<'_>> {
        let root = fs::canonicalize(&self.config.target_dir)
            .map_err(|_| CbpError::InvalidRoot(self.config.target_dir.clone()))?;
        if !root.is_dir() {
            return Err(CbpError::InvalidRoot(self.config.target_dir.clone()));
        }

        let mut visited = HashSet::new();
        visited.insert(root.clone());

        // A root that cannot be listed is fatal; there is nothing left
        // to produce output from.
        let entries = list_dir(&root, Path::new(""))?;

        Ok(Walk {
            filter: &self.filter,
            output_file: resolve_output_path(&self.config.output_file),
            stack: vec![entries.into_iter()],
            visited,
            dirs_skipped: 0,
        })
    }
}

/// A directory child queued for filtering, with its paths precomputed
struct Candidate {
    /// Absolute path on disk
    abs: PathBuf,
    /// Path relative to the scan root
    rel: PathBuf,
}

/// Lazy, ordered sequence of files that pass the filter.
///
/// Finite and single-use; obtain a fresh one from [`Scanner::walk`] to
/// traverse again.
pub struct Walk<'a> {
    filter: &'a FilterConfig,
    /// Absolute output path; the one file the walk never yields
    output_file: PathBuf,
    /// Per-directory sorted listings, innermost last
    stack: Vec<std::vec::IntoIter<Candidate>>,
    /// Canonical paths of every directory entered during this walk
    visited: HashSet<PathBuf>,
    dirs_skipped: usize,
}

impl Walk<'_> {
    /// Number of subtrees dropped because their directory could not be
    /// listed or resolved
    pub fn dirs_skipped(&self) -> usize {
        self.dirs_skipped
    }

    /// Enter a directory unless it was already visited under another name
    fn push_dir(&mut self, candidate: Candidate) {
        let canonical = match fs::canonicalize(&candidate.abs) {
            Ok(canonical) => canonical,
            Err(e) => {
                self.skip_dir(candidate.abs, e);
                return;
            }
        };
        if !self.visited.insert(canonical) {
            // Symlink cycle or a second link to an already-walked directory
            return;
        }
        match list_dir(&candidate.abs, &candidate.rel) {
            Ok(entries) => self.stack.push(entries.into_iter()),
            Err(e) => self.skip_dir(candidate.abs, e),
        }
    }

    fn skip_dir(&mut self, path: PathBuf, source: io::Error) {
        let err = CbpError::DirectoryList { path, source };
        eprintln!("Warning: {}", err);
        self.dirs_skipped += 1;
    }
}

impl Iterator for Walk<'_> {
    type Item = FileEntry;

    fn next(&mut self) -> Option<FileEntry> {
        loop {
            let frame = self.stack.last_mut()?;
            let Some(candidate) = frame.next() else {
                self.stack.pop();
                continue;
            };

            if candidate.abs.is_dir() {
                if self.filter.should_descend(&candidate.abs) {
                    self.push_dir(candidate);
                }
                continue;
            }

            // Never re-ingest a previously generated document
            if candidate.abs == self.output_file {
                continue;
            }

            if self.filter.should_include(&candidate.abs) {
                return Some(FileEntry::new(candidate.rel, candidate.abs));
            }
        }
    }
}

/// Absolute form of the configured output path, for exact comparison
/// against walked files. The file may not exist yet, so only its
/// directory is canonicalized.
fn resolve_output_path(output: &Path) -> PathBuf {
    let name = output.file_name().unwrap_or_default().to_os_string();
    let parent = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    match fs::canonicalize(parent) {
        Ok(dir) => dir.join(&name),
        Err(_) => output.to_path_buf(),
    }
}

/// List a directory's children sorted lexicographically by name.
///
/// Fails when the directory itself or any entry within it cannot be
/// read; callers treat either as a listing failure for the whole
/// directory.
fn list_dir(abs: &Path, rel: &Path) -> io::Result<Vec<Candidate>> {
    let mut children = fs::read_dir(abs)?
        .map(|entry| {
            let entry = entry?;
            let name = entry.file_name();
            Ok(Candidate {
                abs: entry.path(),
                rel: rel.join(&name),
            })
        })
        .collect::<io::Result<Vec<_>>>()?;

    children.sort_by(|a, b| a.abs.file_name().cmp(&b.abs.file_name()));

    Ok(children)
}
