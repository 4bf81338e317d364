/*!
 * Core types and data structures for the cbp application
 */

use std::path::PathBuf;

/// A file that passed filtering and is queued for the output document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path relative to the scan root
    pub relative_path: PathBuf,
    /// Absolute path on disk
    pub absolute_path: PathBuf,
}

impl FileEntry {
    /// Create an entry from a scan-root-relative path and its on-disk path
    pub fn new(relative_path: PathBuf, absolute_path: PathBuf) -> Self {
        Self {
            relative_path,
            absolute_path,
        }
    }
}
