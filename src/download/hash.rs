//! Digest algorithms used to verify downloaded archives.
//!
//! Distribution data names its checksum algorithm with a string such as
//! `"SHA-256"`. [`Algorithm`] parses those names and [`Hasher`] computes the
//! matching digest incrementally, so a download can be hashed while it is
//! streamed to disk.
//!
//! # Examples
//!
//! ```rust
//! use jextract_store::download::hash::{Algorithm, Hasher};
//!
//! let algorithm: Algorithm = "SHA-256".parse()?;
//! let mut hasher = Hasher::new(algorithm);
//! hasher.update(b"");
//! assert_eq!(
//!     hasher.finalize_hex(),
//!     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
//! );
//! # Ok::<(), jextract_store::Error>(())
//! ```

use crate::error::Error;

use sha2::{Digest, Sha256, Sha384, Sha512};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tokio::{fs::File, io::AsyncReadExt};

/// Supported digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    /// SHA-256, used by all published jextract checksums.
    #[default]
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
}

impl Algorithm {
    /// Canonical name, as written in distribution data.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sha256 => "SHA-256",
            Self::Sha384 => "SHA-384",
            Self::Sha512 => "SHA-512",
        }
    }

    /// Length of the lower-case hex digest.
    pub fn hex_len(&self) -> usize {
        match self {
            Self::Sha256 => 64,
            Self::Sha384 => 96,
            Self::Sha512 => 128,
        }
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    /// Accepts `SHA-256`, `sha256`, `sha_256` and the same spellings of the
    /// other variants.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            _ => Err(Error::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Incremental digest computation for one of the supported algorithms.
pub enum Hasher {
    Sha256(Sha256),
    Sha384(Sha384),
    Sha512(Sha512),
}

impl Hasher {
    pub fn new(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Sha256 => Self::Sha256(Sha256::new()),
            Algorithm::Sha384 => Self::Sha384(Sha384::new()),
            Algorithm::Sha512 => Self::Sha512(Sha512::new()),
        }
    }

    pub fn update(&mut self, data: &[u8]) {
        match self {
            Self::Sha256(h) => h.update(data),
            Self::Sha384(h) => h.update(data),
            Self::Sha512(h) => h.update(data),
        }
    }

    /// Consume the hasher and return the lower-case hex digest.
    pub fn finalize_hex(self) -> String {
        match self {
            Self::Sha256(h) => hex::encode(h.finalize()),
            Self::Sha384(h) => hex::encode(h.finalize()),
            Self::Sha512(h) => hex::encode(h.finalize()),
        }
    }
}

/// Compare a computed digest against an expected checksum.
///
/// Published checksums are sometimes upper-case, so the comparison ignores
/// ASCII case and surrounding whitespace.
pub fn checksum_matches(expected: &str, calculated: &str) -> bool {
    expected.trim().eq_ignore_ascii_case(calculated)
}

/// Compute the hex digest of a whole file.
pub async fn file_digest(path: &Path, algorithm: Algorithm) -> std::io::Result<String> {
    let mut file = File::open(path).await?;
    let mut hasher = Hasher::new(algorithm);
    let mut buffer = vec![0u8; 64 * 1024];

    loop {
        let n = file.read(&mut buffer).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hasher.finalize_hex())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn test_parse_algorithm_names() {
        assert_eq!("SHA-256".parse::<Algorithm>().unwrap(), Algorithm::Sha256);
        assert_eq!("sha256".parse::<Algorithm>().unwrap(), Algorithm::Sha256);
        assert_eq!("sha-384".parse::<Algorithm>().unwrap(), Algorithm::Sha384);
        assert_eq!("SHA_512".parse::<Algorithm>().unwrap(), Algorithm::Sha512);
    }

    #[test]
    fn test_parse_unsupported_algorithm() {
        let err = "MD5".parse::<Algorithm>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedAlgorithm(name) if name == "MD5"));
    }

    #[test]
    fn test_hex_lengths() {
        for algorithm in [Algorithm::Sha256, Algorithm::Sha384, Algorithm::Sha512] {
            let mut hasher = Hasher::new(algorithm);
            hasher.update(b"jextract");
            assert_eq!(hasher.finalize_hex().len(), algorithm.hex_len());
        }
    }

    #[test]
    fn test_incremental_matches_one_shot() {
        let mut chunked = Hasher::new(Algorithm::Sha256);
        chunked.update(b"Hello, ");
        chunked.update(b"World!");

        let mut whole = Hasher::new(Algorithm::Sha256);
        whole.update(b"Hello, World!");

        assert_eq!(chunked.finalize_hex(), whole.finalize_hex());
    }

    #[test]
    fn test_checksum_matches_ignores_case() {
        assert!(checksum_matches(&EMPTY_SHA256.to_uppercase(), EMPTY_SHA256));
        assert!(checksum_matches(&format!(" {EMPTY_SHA256}\n"), EMPTY_SHA256));
        assert!(!checksum_matches("abc", EMPTY_SHA256));
    }

    #[tokio::test]
    async fn test_file_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty");
        std::fs::write(&path, b"").unwrap();

        let digest = file_digest(&path, Algorithm::Sha256).await.unwrap();
        assert_eq!(digest, EMPTY_SHA256);
    }
}
