//! Global error handling for cbp
//!
//! Fatal errors abort the run with a non-zero exit code. Per-path errors
//! (`FileRead`, `DirectoryList`) are reported, counted, and the run
//! continues without them.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Global error type for cbp operations
#[derive(Error, Debug)]
pub enum CbpError {
    /// User config file was requested but could not be read or parsed
    #[error("config error: {0}")]
    Config(String),

    /// Project directory is missing or not a directory
    #[error("invalid project directory: {}", .0.display())]
    InvalidRoot(PathBuf),

    /// A file could not be read as UTF-8 text. Non-fatal; the file is skipped.
    #[error("failed to read {}: {reason}", .path.display())]
    FileRead { path: PathBuf, reason: String },

    /// A directory could not be listed. Non-fatal; the subtree is skipped.
    #[error("failed to list {}: {source}", .path.display())]
    DirectoryList { path: PathBuf, source: io::Error },

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Specialized Result type for cbp operations
pub type Result<T> = std::result::Result<T, CbpError>;
