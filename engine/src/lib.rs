//! # Snapback Engine - Incremental Directory Backup Library
//!
//! A headless engine for incremental directory backups, designed as the
//! foundation for multiple front ends (CLI, automation).
//!
//! ## Overview
//!
//! The engine walks a source tree in deterministic order, digests every
//! non-excluded file, and copies the changed ones to a destination that
//! mirrors the source's relative layout. A manifest mapping relative path to
//! content digest is persisted under the destination, so a later incremental
//! run can skip files whose bytes have not changed. It features:
//! - Content-based change detection (chunked, bounded-memory hashing)
//! - Full and incremental modes
//! - Glob exclusion rules applied to relative paths
//! - Dry-run reporting without side effects
//! - Progress reporting via an observer trait (decoupled from UI technology)
//!
//! ## Basic Usage
//!
//! ```no_run
//! use engine::{run_backup, BackupConfig, Mode};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = BackupConfig::new("/data/projects", "/backups/projects");
//! config.mode = Mode::Incremental;
//!
//! let stats = run_backup(&config, None)?;
//! println!(
//!     "copied {} files ({} bytes), skipped {}",
//!     stats.files_copied, stats.bytes_copied, stats.skipped
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - **model**: Configuration, statistics, and exclusion rules
//! - **error**: Error types and handling
//! - **checksums**: Content digest computation
//! - **manifest**: Manifest load/save (the backup's durable state)
//! - **fs_ops**: Deterministic tree walk and chunked copy primitive
//! - **backup**: Run orchestration
//! - **progress**: Observer trait for run events

pub mod backup;
pub mod checksums;
pub mod error;
pub mod fs_ops;
pub mod manifest;
pub mod model;
pub mod progress;

// Re-export main types and functions
pub use backup::run_backup;
pub use checksums::{digest_file, DigestAlgorithm, CHUNK_SIZE};
pub use error::BackupError;
pub use manifest::{Manifest, STATE_FILE_NAME};
pub use model::{BackupConfig, BackupStats, ExcludeSet, Mode};
pub use progress::BackupObserver;
