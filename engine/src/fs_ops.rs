//! Filesystem operations.
//!
//! This module provides the low-level pieces the sync engine builds on:
//! - Deterministic enumeration of a source tree
//! - Chunked file copying with an exact byte count
//! - Parent directory creation

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::checksums::CHUNK_SIZE;
use crate::error::BackupError;

/// A regular file discovered under the source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Absolute path of the file under the source root
    pub path: PathBuf,

    /// Path relative to the source root, forward-slash separated
    pub relative: String,
}

/// Enumerate every regular file under `source` in deterministic order.
///
/// Entries are sorted lexicographically by name at each directory level, and
/// a directory's files are visited before its subdirectories, so repeated
/// runs over identical trees yield identical orderings. Entries that are
/// neither regular files nor directories (sockets, dangling symlinks) are
/// not discovered.
pub fn collect_source_files(source: &Path) -> Result<Vec<SourceFile>, BackupError> {
    let mut files = Vec::new();
    collect_dir(source, "", &mut files)?;
    Ok(files)
}

fn collect_dir(dir: &Path, prefix: &str, out: &mut Vec<SourceFile>) -> Result<(), BackupError> {
    let enumeration_failed = |e| BackupError::EnumerationFailed {
        path: dir.to_path_buf(),
        source: e,
    };

    let mut subdirs = Vec::new();
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(enumeration_failed)? {
        let entry = entry.map_err(enumeration_failed)?;
        let file_type = entry.file_type().map_err(enumeration_failed)?;
        if file_type.is_dir() {
            subdirs.push(entry.file_name());
        } else if file_type.is_file() {
            names.push(entry.file_name());
        }
    }
    subdirs.sort();
    names.sort();

    for name in names {
        out.push(SourceFile {
            path: dir.join(&name),
            relative: join_relative(prefix, &name.to_string_lossy()),
        });
    }
    for name in subdirs {
        let relative = join_relative(prefix, &name.to_string_lossy());
        collect_dir(&dir.join(&name), &relative, out)?;
    }
    Ok(())
}

fn join_relative(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", prefix, name)
    }
}

/// Copy `src` to `dst` in fixed-size chunks, returning the exact byte count
/// written.
///
/// Missing parent directories of `dst` are created first. The source
/// modification time is carried onto the copy when available; a failure to
/// set it does not fail the copy.
pub fn copy_file(src: &Path, dst: &Path) -> Result<u64, BackupError> {
    ensure_parent_dir(dst)?;

    let mut reader = fs::File::open(src).map_err(|e| BackupError::ReadError {
        path: src.to_path_buf(),
        source: e,
    })?;
    let src_mtime = reader.metadata().ok().and_then(|m| m.modified().ok());

    let mut writer = fs::File::create(dst).map_err(|e| BackupError::WriteError {
        path: dst.to_path_buf(),
        source: e,
    })?;

    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut bytes_copied = 0u64;
    loop {
        let n = reader.read(&mut buffer).map_err(|e| BackupError::ReadError {
            path: src.to_path_buf(),
            source: e,
        })?;
        if n == 0 {
            break;
        }
        writer
            .write_all(&buffer[..n])
            .map_err(|e| BackupError::WriteError {
                path: dst.to_path_buf(),
                source: e,
            })?;
        bytes_copied += n as u64;
    }

    if let Some(mtime) = src_mtime {
        let _ = filetime::set_file_mtime(dst, filetime::FileTime::from_system_time(mtime));
    }

    Ok(bytes_copied)
}

/// Create the parent directory of `path` if it does not exist yet.
pub fn ensure_parent_dir(path: &Path) -> Result<(), BackupError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| BackupError::DirectoryCreationFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }
    Ok(())
}
