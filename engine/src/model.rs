//! Core data model for backup runs.
//!
//! This module defines the structures a run is built from:
//! - BackupConfig: the immutable per-run configuration
//! - BackupStats: the counters returned by a run
//! - Mode, ExcludeSet: enums and rules controlling copy decisions

use std::fmt;
use std::path::PathBuf;

use glob::Pattern;
use serde::Serialize;

use crate::checksums::DigestAlgorithm;
use crate::error::BackupError;

/// The backup mode for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Copy every non-excluded file unconditionally
    Full,
    /// Copy only files whose digest differs from the manifest's record
    Incremental,
}

impl Mode {
    /// Parse a mode from its command-line spelling.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "full" => Some(Self::Full),
            "incremental" => Some(Self::Incremental),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Full => write!(f, "full"),
            Mode::Incremental => write!(f, "incremental"),
        }
    }
}

/// An ordered set of glob patterns matched against relative file paths.
///
/// A file is excluded if any pattern matches its forward-slash relative path.
/// Patterns use shell-glob syntax (`*`, `?`, `[...]`); `*` is not
/// separator-aware, so `*.log` also matches `nested/a.log`.
#[derive(Debug, Clone, Default)]
pub struct ExcludeSet {
    patterns: Vec<Pattern>,
}

impl ExcludeSet {
    /// An exclude set that matches nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compile raw pattern strings into an exclude set.
    pub fn compile(patterns: &[String]) -> Result<Self, BackupError> {
        let mut compiled = Vec::with_capacity(patterns.len());
        for raw in patterns {
            let pattern = Pattern::new(raw).map_err(|e| BackupError::InvalidPattern {
                pattern: raw.clone(),
                source: e,
            })?;
            compiled.push(pattern);
        }
        Ok(Self { patterns: compiled })
    }

    /// True if any pattern matches the given relative path.
    pub fn matches(&self, relative_path: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(relative_path))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }
}

/// Immutable configuration for a single backup run.
#[derive(Debug, Clone)]
pub struct BackupConfig {
    /// Root source directory
    pub source: PathBuf,

    /// Root destination directory (created if missing)
    pub destination: PathBuf,

    /// Full or incremental copy decisions
    pub mode: Mode,

    /// Glob rules suppressing files from the run entirely
    pub excludes: ExcludeSet,

    /// Manifest location override; defaults to a hidden file under destination
    pub state_file: Option<PathBuf>,

    /// Digest algorithm used for change detection
    pub algorithm: DigestAlgorithm,

    /// Report decisions without copying or writing the manifest
    pub dry_run: bool,
}

impl BackupConfig {
    /// Build a configuration with the default mode (incremental), no
    /// exclusions, the default manifest location and the sha256 digest.
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        BackupConfig {
            source: source.into(),
            destination: destination.into(),
            mode: Mode::Incremental,
            excludes: ExcludeSet::empty(),
            state_file: None,
            algorithm: DigestAlgorithm::Sha256,
            dry_run: false,
        }
    }
}

/// Counters accumulated over one backup run.
///
/// Fields are declared in sorted key order so serialized reports come out
/// with stable, diff-friendly key ordering.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BackupStats {
    /// Bytes actually written to the destination
    pub bytes_copied: u64,

    /// Wall-clock duration of the walk, fractional seconds
    pub duration: f64,

    /// Files copied (or that would be copied, under dry-run)
    pub files_copied: u64,

    /// Files skipped because their digest matched the prior manifest
    pub skipped: u64,
}
