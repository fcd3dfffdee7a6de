//! Manifest persistence.
//!
//! The manifest is the backup's durable state: a mapping from forward-slash
//! relative path to content digest, representing the last fully completed
//! run. It is loaded once at run start and replaced wholesale at run end,
//! never merged incrementally.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::BackupError;

/// Default manifest filename, placed directly under the destination root.
pub const STATE_FILE_NAME: &str = ".snapback_state.json";

/// Mapping of relative file path to content digest.
///
/// A `BTreeMap` keeps keys sorted so the persisted document is reproducible
/// and diff-friendly. Ordering carries no other significance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    files: BTreeMap<String, String>,
}

impl Manifest {
    /// Load the manifest at `path`, or an empty manifest if nothing exists
    /// there.
    ///
    /// A file that exists but does not parse as a manifest document (not
    /// JSON, or missing the top-level `files` mapping) is a `ManifestParse`
    /// error; change-tracking history is never silently discarded.
    pub fn load(path: &Path) -> Result<Self, BackupError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(BackupError::ManifestRead {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };

        serde_json::from_str(&raw).map_err(|e| BackupError::ManifestParse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Persist the manifest to `path`, creating missing parent directories.
    ///
    /// The document is written to a `.tmp` sibling and renamed over the
    /// target, so a crash mid-write cannot leave a file that `load` accepts
    /// but misreads.
    pub fn save(&self, path: &Path) -> Result<(), BackupError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| BackupError::ManifestWrite {
                    path: path.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| BackupError::ManifestWrite {
            path: path.to_path_buf(),
            source: e.into(),
        })?;

        let tmp = tmp_path(path);
        fs::write(&tmp, json).map_err(|e| BackupError::ManifestWrite {
            path: tmp.clone(),
            source: e,
        })?;
        fs::rename(&tmp, path).map_err(|e| BackupError::ManifestWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Digest recorded for a relative path, if any.
    pub fn digest(&self, relative_path: &str) -> Option<&str> {
        self.files.get(relative_path).map(String::as_str)
    }

    /// Record a path's digest, replacing any previous entry.
    pub fn record(&mut self, relative_path: String, digest: String) {
        self.files.insert(relative_path, digest);
    }

    pub fn contains(&self, relative_path: &str) -> bool {
        self.files.contains_key(relative_path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The full path-to-digest mapping, sorted by path.
    pub fn files(&self) -> &BTreeMap<String, String> {
        &self.files
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}
