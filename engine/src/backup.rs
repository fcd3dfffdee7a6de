//! Run orchestration.
//!
//! `run_backup` is the engine's public operation: validate the
//! configuration, load the prior manifest, walk the source tree in
//! deterministic order, copy or skip each file, and persist the new
//! manifest. One file is processed at a time; the first failure aborts the
//! whole run before the manifest save, so a failed run never replaces the
//! last valid manifest.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::checksums;
use crate::error::BackupError;
use crate::fs_ops;
use crate::manifest::{Manifest, STATE_FILE_NAME};
use crate::model::{BackupConfig, BackupStats, Mode};
use crate::progress::BackupObserver;

/// Execute a backup run described by `config`.
///
/// Side effects: creates the destination tree, writes files under it, and
/// replaces the manifest wholesale (both suppressed under dry-run except
/// destination directory creation). Returns the run's counters; the walk
/// duration is stamped on every exit path, including failures.
pub fn run_backup(
    config: &BackupConfig,
    observer: Option<&dyn BackupObserver>,
) -> Result<BackupStats, BackupError> {
    let source = absolute(&config.source).map_err(|e| BackupError::ReadError {
        path: config.source.clone(),
        source: e,
    })?;
    validate_source(&source)?;

    let destination = absolute(&config.destination).map_err(|e| BackupError::ReadError {
        path: config.destination.clone(),
        source: e,
    })?;
    fs::create_dir_all(&destination).map_err(|e| BackupError::DirectoryCreationFailed {
        path: destination.clone(),
        source: e,
    })?;

    let state_path = match &config.state_file {
        Some(path) => absolute(path).map_err(|e| BackupError::ManifestRead {
            path: path.clone(),
            source: e,
        })?,
        None => destination.join(STATE_FILE_NAME),
    };

    // Always loaded, whatever the mode: a prior incremental manifest must
    // survive an intervening full run for later runs to compare against.
    let previous = Manifest::load(&state_path)?;
    let mut next = Manifest::default();
    let mut stats = BackupStats::default();

    if let Some(obs) = observer {
        obs.on_run_started(config);
    }

    let started = Instant::now();
    let outcome = sync_tree(
        config,
        &source,
        &destination,
        &previous,
        &mut next,
        &mut stats,
        observer,
    );
    stats.duration = started.elapsed().as_secs_f64();
    outcome?;

    if !config.dry_run {
        next.save(&state_path)?;
    }

    if let Some(obs) = observer {
        obs.on_run_completed(&stats);
    }
    Ok(stats)
}

/// Walk the source tree and process each discovered file in order.
fn sync_tree(
    config: &BackupConfig,
    source: &Path,
    destination: &Path,
    previous: &Manifest,
    next: &mut Manifest,
    stats: &mut BackupStats,
    observer: Option<&dyn BackupObserver>,
) -> Result<(), BackupError> {
    for file in fs_ops::collect_source_files(source)? {
        // Excluded files vanish from the run: not hashed, not counted, not
        // recorded. Existing destination copies stay untouched.
        if config.excludes.matches(&file.relative) {
            continue;
        }

        let digest = checksums::digest_file(&file.path, config.algorithm)?;
        let unchanged = previous.digest(&file.relative) == Some(digest.as_str());
        next.record(file.relative.clone(), digest);

        if config.mode == Mode::Incremental && unchanged {
            stats.skipped += 1;
            if let Some(obs) = observer {
                obs.on_file_skipped(&file.relative);
            }
            continue;
        }

        if let Some(obs) = observer {
            obs.on_file_copied(&file.relative, config.dry_run);
        }
        if !config.dry_run {
            let dest_path = destination.join(&file.relative);
            stats.bytes_copied += fs_ops::copy_file(&file.path, &dest_path)?;
        }
        stats.files_copied += 1;
    }
    Ok(())
}

fn validate_source(source: &Path) -> Result<(), BackupError> {
    match fs::metadata(source) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(BackupError::SourceNotDirectory {
            path: source.to_path_buf(),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(BackupError::SourceNotFound {
            path: source.to_path_buf(),
        }),
        Err(e) => Err(BackupError::ReadError {
            path: source.to_path_buf(),
            source: e,
        }),
    }
}

fn absolute(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
