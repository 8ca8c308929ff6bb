//! Downloadable resources.
//!
//! A [`DownloadResource`] fully describes what has to be fetched and how the
//! result is verified: the URL, the expected checksum and the digest algorithm
//! that produced it.
//!
//! ```rust
//! use jextract_store::download::{Algorithm, DownloadResource};
//!
//! let resource = DownloadResource::parse(
//!     "https://example.com/jextract/openjdk-22-jextract+6-47_linux-x64_bin.tar.gz",
//!     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
//!     Algorithm::Sha256,
//! )?;
//! assert_eq!(resource.filename()?, "openjdk-22-jextract+6-47_linux-x64_bin.tar.gz");
//! # Ok::<(), jextract_store::Error>(())
//! ```

use super::hash::Algorithm;
use crate::error::Error;

use reqwest::Url;

/// Data describing a downloadable file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DownloadResource {
    /// Location of the file.
    pub url: Url,
    /// Expected hex digest of the file's contents.
    pub checksum: String,
    /// Algorithm that produced `checksum`.
    pub algorithm: Algorithm,
}

impl DownloadResource {
    pub fn new(url: Url, checksum: impl Into<String>, algorithm: Algorithm) -> Self {
        Self {
            url,
            checksum: checksum.into(),
            algorithm,
        }
    }

    /// Create a resource from a URL string.
    pub fn parse(url: &str, checksum: impl Into<String>, algorithm: Algorithm) -> Result<Self, Error> {
        let url = Url::parse(url).map_err(|e| {
            Error::InvalidUrl(format!("The url \"{}\" cannot be parsed: {}", url, e))
        })?;
        Ok(Self::new(url, checksum, algorithm))
    }

    /// The file name of the resource, taken from the URL's last path segment.
    pub fn filename(&self) -> Result<String, Error> {
        filename_from_url(&self.url)
    }
}

/// Extract the decoded final path segment of `url`.
pub fn filename_from_url(url: &Url) -> Result<String, Error> {
    let segment = url
        .path_segments()
        .ok_or_else(|| {
            Error::InvalidUrl(format!("The url \"{}\" does not contain a valid path", url))
        })?
        .next_back()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            Error::InvalidUrl(format!("The url \"{}\" does not contain a filename", url))
        })?;

    // Percent-decode the segment; '+' is kept literally as it appears in
    // jextract archive names.
    let encoded = segment.replace('+', "%2B");
    Ok(form_urlencoded::parse(encoded.as_bytes())
        .map(|(key, val)| [key, val].concat())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_from_url() {
        let url = Url::parse("https://example.com/a/b/file.tar.gz").unwrap();
        assert_eq!(filename_from_url(&url).unwrap(), "file.tar.gz");
    }

    #[test]
    fn test_filename_keeps_plus_signs() {
        let url = Url::parse(
            "https://download.java.net/java/early_access/jextract/22/6/openjdk-22-jextract+6-47_macos-aarch64_bin.tar.gz",
        )
        .unwrap();
        assert_eq!(
            filename_from_url(&url).unwrap(),
            "openjdk-22-jextract+6-47_macos-aarch64_bin.tar.gz"
        );
    }

    #[test]
    fn test_filename_percent_decoded() {
        let url = Url::parse("https://example.com/my%20file.tar.gz").unwrap();
        assert_eq!(filename_from_url(&url).unwrap(), "my file.tar.gz");
    }

    #[test]
    fn test_filename_missing() {
        let url = Url::parse("https://example.com/dir/").unwrap();
        assert!(matches!(filename_from_url(&url), Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_parse_invalid_url() {
        let result = DownloadResource::parse("not a url", "00", Algorithm::Sha256);
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_value_equality() {
        let a = DownloadResource::parse("https://example.com/f.tgz", "ab", Algorithm::Sha256).unwrap();
        let b = DownloadResource::parse("https://example.com/f.tgz", "ab", Algorithm::Sha256).unwrap();
        assert_eq!(a, b);
    }
}
