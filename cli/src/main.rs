//! Snapback - Command-line interface for the backup engine.
//!
//! Thin glue around `engine::run_backup`: argument parsing, copy-line and
//! summary printing, optional JSON report, and exit-code mapping.

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process;

use engine::{
    run_backup, BackupConfig, BackupObserver, BackupStats, DigestAlgorithm, ExcludeSet, Mode,
};

const EXIT_INVALID_ARGS: i32 = 1;
const EXIT_RUNTIME_ERROR: i32 = 2;

/// Snapback - incremental directory backups
#[derive(Parser, Debug)]
#[command(name = "snapback")]
#[command(version = "0.1.0")]
#[command(about = "Copy changed files from a source tree to a backup destination")]
struct Args {
    /// Source directory
    #[arg(value_name = "SRC_DIR")]
    src_dir: PathBuf,

    /// Destination directory
    #[arg(value_name = "DEST_DIR")]
    dest_dir: PathBuf,

    /// Backup mode: full or incremental
    #[arg(long, value_name = "MODE", default_value = "incremental")]
    mode: String,

    /// Glob pattern to exclude, matched against relative paths (repeatable)
    #[arg(long = "exclude", value_name = "GLOB")]
    exclude: Vec<String>,

    /// Path to the state file (default: a hidden file under the destination)
    #[arg(long, value_name = "PATH")]
    state_file: Option<PathBuf>,

    /// Show actions without copying files or writing state
    #[arg(long)]
    dry_run: bool,

    /// Write a JSON summary to the given path
    #[arg(long, value_name = "PATH")]
    json_report: Option<PathBuf>,

    /// Digest algorithm: md5, sha256, or blake3
    #[arg(long, value_name = "ALGORITHM", default_value = "sha256")]
    hash: String,

    /// Also print skipped files and a run header
    #[arg(long)]
    verbose: bool,
}

/// Stdout implementation of the engine's observer: one line per copy action.
struct CliProgress {
    verbose: bool,
}

impl BackupObserver for CliProgress {
    fn on_run_started(&self, config: &BackupConfig) {
        if self.verbose {
            println!(
                "Backing up {} -> {} ({})",
                config.source.display(),
                config.destination.display(),
                config.mode
            );
        }
    }

    fn on_file_copied(&self, relative_path: &str, dry_run: bool) {
        if dry_run {
            println!("DRY-RUN COPY {}", relative_path);
        } else {
            println!("COPY {}", relative_path);
        }
    }

    fn on_file_skipped(&self, relative_path: &str) {
        if self.verbose {
            println!("SKIP {}", relative_path);
        }
    }

    fn on_run_completed(&self, _stats: &BackupStats) {}
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if err.use_stderr() => {
            let _ = err.print();
            process::exit(EXIT_INVALID_ARGS);
        }
        // --help and --version land here
        Err(err) => err.exit(),
    };

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            process::exit(EXIT_INVALID_ARGS);
        }
    };

    match run_cli(&args, &config) {
        Ok(()) => {}
        Err(msg) => {
            eprintln!("Error: {}", msg);
            process::exit(EXIT_RUNTIME_ERROR);
        }
    }
}

/// Translate parsed arguments into a typed engine configuration.
///
/// Failures here are argument errors, not runtime errors.
fn build_config(args: &Args) -> Result<BackupConfig, String> {
    let mode = Mode::from_str(&args.mode)
        .ok_or_else(|| format!("Invalid mode '{}'. Must be 'full' or 'incremental'", args.mode))?;

    let algorithm = DigestAlgorithm::from_str(&args.hash).ok_or_else(|| {
        format!(
            "Invalid hash algorithm '{}'. Must be 'md5', 'sha256', or 'blake3'",
            args.hash
        )
    })?;

    let excludes = ExcludeSet::compile(&args.exclude).map_err(|e| e.to_string())?;

    let mut config = BackupConfig::new(&args.src_dir, &args.dest_dir);
    config.mode = mode;
    config.algorithm = algorithm;
    config.excludes = excludes;
    config.state_file = args.state_file.clone();
    config.dry_run = args.dry_run;
    Ok(config)
}

/// Run the backup, print the summary, and write the optional JSON report.
fn run_cli(args: &Args, config: &BackupConfig) -> Result<(), String> {
    let progress = CliProgress {
        verbose: args.verbose,
    };

    let stats = run_backup(config, Some(&progress)).map_err(|e| e.to_string())?;

    println!(
        "Completed in {:.2}s - copied {} files ({} bytes), skipped {}",
        stats.duration, stats.files_copied, stats.bytes_copied, stats.skipped
    );

    if let Some(report_path) = &args.json_report {
        write_report(report_path, &stats)
            .map_err(|e| format!("Failed to write JSON report: {}", e))?;
    }

    Ok(())
}

/// Serialize the run summary; the backup itself has already completed by the
/// time this can fail.
fn write_report(path: &Path, stats: &BackupStats) -> Result<(), std::io::Error> {
    let json = serde_json::to_string_pretty(stats)?;
    std::fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args_for(src: &TempDir, dest: &TempDir) -> Args {
        Args {
            src_dir: src.path().to_path_buf(),
            dest_dir: dest.path().to_path_buf(),
            mode: "incremental".to_string(),
            exclude: Vec::new(),
            state_file: None,
            dry_run: false,
            json_report: None,
            hash: "sha256".to_string(),
            verbose: false,
        }
    }

    #[test]
    fn test_cli_full_backup() {
        let src = TempDir::new().expect("Failed to create temp dir");
        let dest = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(src.path().join("sample.txt"), "cli").expect("write");

        let mut args = args_for(&src, &dest);
        args.mode = "full".to_string();
        let config = build_config(&args).expect("config");

        run_cli(&args, &config).expect("run");
        assert!(dest.path().join("sample.txt").exists());
    }

    #[test]
    fn test_cli_rejects_invalid_mode() {
        let src = TempDir::new().expect("Failed to create temp dir");
        let dest = TempDir::new().expect("Failed to create temp dir");

        let mut args = args_for(&src, &dest);
        args.mode = "bad".to_string();
        assert!(build_config(&args).is_err());
    }

    #[test]
    fn test_cli_rejects_invalid_hash() {
        let src = TempDir::new().expect("Failed to create temp dir");
        let dest = TempDir::new().expect("Failed to create temp dir");

        let mut args = args_for(&src, &dest);
        args.hash = "crc99".to_string();
        assert!(build_config(&args).is_err());
    }

    #[test]
    fn test_cli_rejects_bad_glob() {
        let src = TempDir::new().expect("Failed to create temp dir");
        let dest = TempDir::new().expect("Failed to create temp dir");

        let mut args = args_for(&src, &dest);
        args.exclude = vec!["[".to_string()];
        assert!(build_config(&args).is_err());
    }

    #[test]
    fn test_cli_reports_missing_source() {
        let src = TempDir::new().expect("Failed to create temp dir");
        let dest = TempDir::new().expect("Failed to create temp dir");

        let mut args = args_for(&src, &dest);
        args.src_dir = src.path().join("nonexistent");
        let config = build_config(&args).expect("config");

        assert!(run_cli(&args, &config).is_err());
    }

    #[test]
    fn test_cli_writes_json_report() {
        let src = TempDir::new().expect("Failed to create temp dir");
        let dest = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(src.path().join("sample.txt"), "report me").expect("write");

        let report = dest.path().join("report.json");
        let mut args = args_for(&src, &dest);
        args.mode = "full".to_string();
        args.json_report = Some(report.clone());
        let config = build_config(&args).expect("config");

        run_cli(&args, &config).expect("run");

        let raw = std::fs::read_to_string(&report).expect("read report");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
        assert_eq!(value["files_copied"], 1);
        assert_eq!(value["skipped"], 0);
        assert!(value["duration"].is_number());
        assert!(value["bytes_copied"].is_number());
    }

    #[test]
    fn test_cli_dry_run_leaves_destination_untouched() {
        let src = TempDir::new().expect("Failed to create temp dir");
        let dest = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(src.path().join("sample.txt"), "never copied").expect("write");

        let mut args = args_for(&src, &dest);
        args.mode = "full".to_string();
        args.dry_run = true;
        let config = build_config(&args).expect("config");

        run_cli(&args, &config).expect("run");
        assert!(!dest.path().join("sample.txt").exists());
        assert!(!dest.path().join(engine::STATE_FILE_NAME).exists());
    }

    #[test]
    fn test_args_parse_repeatable_excludes() {
        let args = Args::try_parse_from([
            "snapback",
            "/tmp/src",
            "/tmp/dest",
            "--exclude",
            "*.log",
            "--exclude",
            "cache/*",
            "--mode",
            "full",
        ])
        .expect("parse");

        assert_eq!(args.exclude, vec!["*.log".to_string(), "cache/*".to_string()]);
        assert_eq!(args.mode, "full");
        assert!(!args.dry_run);
    }

    #[test]
    fn test_args_require_positionals() {
        assert!(Args::try_parse_from(["snapback", "/tmp/src"]).is_err());
    }
}
