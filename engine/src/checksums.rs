//! Content digest computation.
//!
//! This module provides:
//! - The supported digest algorithms (MD5, SHA-256, BLAKE3)
//! - Chunked file digesting with bounded memory use
//!
//! Digests are used purely for change detection: identical bytes must always
//! produce identical lowercase hex output across runs and platforms.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::BackupError;

/// Chunk size for digesting and copying, 1 MiB.
///
/// Bounds memory use regardless of file size; the copy primitive in `fs_ops`
/// reads with the same granularity.
pub const CHUNK_SIZE: usize = 1024 * 1024;

/// Supported digest algorithms.
///
/// SHA-256 is the default. MD5 is kept for speed on trees where
/// collision resistance is not a concern; BLAKE3 is a faster modern choice
/// with the same 256-bit output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestAlgorithm {
    Md5,
    Sha256,
    Blake3,
}

impl DigestAlgorithm {
    /// Parse an algorithm from its command-line spelling.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "md5" => Some(Self::Md5),
            "sha256" => Some(Self::Sha256),
            "blake3" => Some(Self::Blake3),
            _ => None,
        }
    }

    /// Length of this algorithm's hex digest.
    pub fn hex_len(&self) -> usize {
        match self {
            Self::Md5 => 32,
            Self::Sha256 | Self::Blake3 => 64,
        }
    }

    fn hasher(&self) -> Box<dyn DigestHasher> {
        match self {
            Self::Md5 => Box::new(Md5Hasher::new()),
            Self::Sha256 => Box::new(Sha256Hasher::new()),
            Self::Blake3 => Box::new(Blake3Hasher::new()),
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Md5 => write!(f, "md5"),
            Self::Sha256 => write!(f, "sha256"),
            Self::Blake3 => write!(f, "blake3"),
        }
    }
}

/// Streaming hasher behind a uniform interface.
trait DigestHasher {
    fn update(&mut self, data: &[u8]);

    /// Finalize and return the lowercase hex digest.
    fn finalize(self: Box<Self>) -> String;
}

struct Md5Hasher {
    context: md5::Context,
}

impl Md5Hasher {
    fn new() -> Self {
        Md5Hasher {
            context: md5::Context::new(),
        }
    }
}

impl DigestHasher for Md5Hasher {
    fn update(&mut self, data: &[u8]) {
        self.context.consume(data);
    }

    fn finalize(self: Box<Self>) -> String {
        format!("{:x}", self.context.compute())
    }
}

struct Sha256Hasher {
    hasher: sha2::Sha256,
}

impl Sha256Hasher {
    fn new() -> Self {
        Sha256Hasher {
            hasher: sha2::Sha256::default(),
        }
    }
}

impl DigestHasher for Sha256Hasher {
    fn update(&mut self, data: &[u8]) {
        use sha2::Digest;
        self.hasher.update(data);
    }

    fn finalize(self: Box<Self>) -> String {
        use sha2::Digest;
        format!("{:x}", self.hasher.finalize())
    }
}

struct Blake3Hasher {
    hasher: blake3::Hasher,
}

impl Blake3Hasher {
    fn new() -> Self {
        Blake3Hasher {
            hasher: blake3::Hasher::new(),
        }
    }
}

impl DigestHasher for Blake3Hasher {
    fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    fn finalize(self: Box<Self>) -> String {
        self.hasher.finalize().to_hex().to_string()
    }
}

/// Compute the digest of a file's full byte content using chunked reads.
///
/// An open or read failure aborts with `BackupError::ReadError`; unreadable
/// files are fatal to the run, never silently skipped.
pub fn digest_file(path: &Path, algorithm: DigestAlgorithm) -> Result<String, BackupError> {
    let mut file = File::open(path).map_err(|e| BackupError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut hasher = algorithm.hasher();
    let mut buffer = vec![0u8; CHUNK_SIZE];
    loop {
        let n = file.read(&mut buffer).map_err(|e| BackupError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_algorithm_display() {
        assert_eq!(DigestAlgorithm::Md5.to_string(), "md5");
        assert_eq!(DigestAlgorithm::Sha256.to_string(), "sha256");
        assert_eq!(DigestAlgorithm::Blake3.to_string(), "blake3");
    }

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!(DigestAlgorithm::from_str("md5"), Some(DigestAlgorithm::Md5));
        assert_eq!(DigestAlgorithm::from_str("sha256"), Some(DigestAlgorithm::Sha256));
        assert_eq!(DigestAlgorithm::from_str("blake3"), Some(DigestAlgorithm::Blake3));
        assert_eq!(DigestAlgorithm::from_str("SHA256"), Some(DigestAlgorithm::Sha256));
        assert_eq!(DigestAlgorithm::from_str("invalid"), None);
    }

    fn write_temp(dir: &tempfile::TempDir, name: &str, content: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).expect("Failed to create file");
        file.write_all(content).expect("Failed to write file");
        path
    }

    #[test]
    fn test_sha256_known_vector() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = write_temp(&dir, "hello.txt", b"hello");
        let digest = digest_file(&path, DigestAlgorithm::Sha256).expect("digest");
        assert_eq!(
            digest,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_md5_known_vector() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = write_temp(&dir, "hello.txt", b"hello");
        let digest = digest_file(&path, DigestAlgorithm::Md5).expect("digest");
        assert_eq!(digest, "5d41402abc4b2a76b9719d911017c592");
    }

    #[test]
    fn test_digest_lengths() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = write_temp(&dir, "data.bin", b"some bytes");
        for algo in [
            DigestAlgorithm::Md5,
            DigestAlgorithm::Sha256,
            DigestAlgorithm::Blake3,
        ] {
            let digest = digest_file(&path, algo).expect("digest");
            assert_eq!(digest.len(), algo.hex_len(), "length for {}", algo);
            assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_identical_content_identical_digest() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let a = write_temp(&dir, "a.bin", b"same content");
        let b = write_temp(&dir, "b.bin", b"same content");
        assert_eq!(
            digest_file(&a, DigestAlgorithm::Sha256).expect("digest a"),
            digest_file(&b, DigestAlgorithm::Sha256).expect("digest b"),
        );
    }

    #[test]
    fn test_single_byte_difference_changes_digest() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let a = write_temp(&dir, "a.bin", b"content-x");
        let b = write_temp(&dir, "b.bin", b"content-y");
        assert_ne!(
            digest_file(&a, DigestAlgorithm::Sha256).expect("digest a"),
            digest_file(&b, DigestAlgorithm::Sha256).expect("digest b"),
        );
    }

    #[test]
    fn test_empty_file_digests() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = write_temp(&dir, "empty", b"");
        let digest = digest_file(&path, DigestAlgorithm::Sha256).expect("digest");
        assert_eq!(
            digest,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let result = digest_file(&dir.path().join("missing.txt"), DigestAlgorithm::Sha256);
        assert!(matches!(result, Err(BackupError::ReadError { .. })));
    }
}
