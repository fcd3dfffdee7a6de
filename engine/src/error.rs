//! Error types for the backup engine.
//!
//! The primary error type is `BackupError`. A backup run fails as a whole:
//! the first file-level failure aborts the walk and propagates to the caller,
//! so there is no per-file error ledger to inspect afterwards.

use std::error::Error;
use std::fmt::{self, Display};
use std::io;
use std::path::PathBuf;

/// Errors that can abort a backup run.
///
/// Configuration errors (`SourceNotFound`, `SourceNotDirectory`,
/// `InvalidPattern`) are raised before any I/O side effects occur. Everything
/// else can surface mid-run; in that case the destination may be partially
/// updated but the manifest on disk still reflects the last completed run.
#[derive(Debug)]
pub enum BackupError {
    /// Source directory does not exist
    SourceNotFound { path: PathBuf },

    /// Source path exists but is not a directory
    SourceNotDirectory { path: PathBuf },

    /// An exclusion glob failed to compile
    InvalidPattern {
        pattern: String,
        source: glob::PatternError,
    },

    /// Failed to read a source file
    ReadError { path: PathBuf, source: io::Error },

    /// Failed to write a destination file
    WriteError { path: PathBuf, source: io::Error },

    /// Failed to create a directory
    DirectoryCreationFailed { path: PathBuf, source: io::Error },

    /// Failed to enumerate a source directory
    EnumerationFailed { path: PathBuf, source: io::Error },

    /// Failed to read the manifest file
    ManifestRead { path: PathBuf, source: io::Error },

    /// Manifest file exists but is not a valid manifest document
    ManifestParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Failed to persist the manifest file
    ManifestWrite { path: PathBuf, source: io::Error },
}

impl Display for BackupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceNotFound { path } => {
                write!(f, "Source directory does not exist: {}", path.display())
            }
            Self::SourceNotDirectory { path } => {
                write!(f, "Source is not a directory: {}", path.display())
            }
            Self::InvalidPattern { pattern, source } => {
                write!(f, "Invalid exclude pattern '{}': {}", pattern, source)
            }
            Self::ReadError { path, source } => {
                write!(f, "Failed to read file {}: {}", path.display(), source)
            }
            Self::WriteError { path, source } => {
                write!(f, "Failed to write file {}: {}", path.display(), source)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(f, "Failed to create directory {}: {}", path.display(), source)
            }
            Self::EnumerationFailed { path, source } => {
                write!(f, "Failed to enumerate directory {}: {}", path.display(), source)
            }
            Self::ManifestRead { path, source } => {
                write!(f, "Failed to read manifest {}: {}", path.display(), source)
            }
            Self::ManifestParse { path, source } => {
                write!(f, "Invalid manifest {}: {}", path.display(), source)
            }
            Self::ManifestWrite { path, source } => {
                write!(f, "Failed to write manifest {}: {}", path.display(), source)
            }
        }
    }
}

impl Error for BackupError {}
