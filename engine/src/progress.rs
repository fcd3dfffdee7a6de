//! Run observation trait.
//!
//! `BackupObserver` decouples the engine from any particular UI. The engine
//! reports copy and skip decisions as they happen; what (if anything) gets
//! printed is the caller's concern, and nothing here feeds back into the run
//! or its returned statistics.

use crate::model::{BackupConfig, BackupStats};

/// Receives notifications while a backup run executes.
///
/// All methods are called synchronously from the walk, in the deterministic
/// walk order. The CLI provides a stdout implementation.
pub trait BackupObserver: Send {
    /// Called once after validation, before the walk begins.
    fn on_run_started(&self, config: &BackupConfig);

    /// Called for each file about to be copied (or that would be copied
    /// under dry-run), before the bytes move.
    fn on_file_copied(&self, relative_path: &str, dry_run: bool);

    /// Called for each file skipped because its digest matched the prior
    /// manifest.
    fn on_file_skipped(&self, relative_path: &str);

    /// Called once after the walk completes successfully.
    fn on_run_completed(&self, stats: &BackupStats);
}
