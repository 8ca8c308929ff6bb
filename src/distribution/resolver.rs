//! Distribution metadata lookup.

use super::properties::{Properties, PropertiesCache};
use crate::download::resource::filename_from_url;
use crate::download::{Algorithm, DownloadResource};
use crate::error::{Error, Result};
use crate::platform::{Architecture, Platform};

use reqwest::Url;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Prefix of every distribution data key.
pub const KEY_PREFIX: &str = "jextract";

/// Oldest jextract version the runtime mapping falls back to.
pub const MIN_VERSION: u32 = 19;

/// Newest jextract version the runtime mapping clamps to.
///
/// Raising this bound changes which archive every newer runtime downloads,
/// so it moves only together with the bundled data.
pub const MAX_VERSION: u32 = 22;

/// Runtime versions that have a dedicated jextract release outside the
/// clamped range, as `(runtime, jextract)` pairs.
pub const PINNED_VERSIONS: &[(u32, u32)] = &[(25, 25)];

/// Checksum key suffixes, in lookup order, and the algorithm each names.
const CHECKSUM_SUFFIXES: &[(&str, Algorithm)] = &[
    ("sha-256", Algorithm::Sha256),
    ("sha-384", Algorithm::Sha384),
    ("sha-512", Algorithm::Sha512),
];

const BUNDLED: &str = include_str!("jextract.properties");

/// Helpers for consistent URLs, checksums and file names of jextract
/// distributions, depending on version and platform.
#[derive(Debug)]
pub struct DistributionStore {
    platform: Platform,
    cache: Arc<PropertiesCache>,
}

impl Default for DistributionStore {
    fn default() -> Self {
        Self::new(Platform::current())
    }
}

impl DistributionStore {
    /// A store backed by the bundled distribution data.
    pub fn new(platform: Platform) -> Self {
        Self::with_bundled(platform, BUNDLED)
    }

    /// A store backed by other default data, mostly useful for tests.
    pub fn with_bundled(platform: Platform, bundled: &'static str) -> Self {
        Self {
            platform,
            cache: Arc::new(PropertiesCache::new(bundled)),
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// File name of the jextract launcher on this platform.
    pub fn executable_filename(&self) -> &'static str {
        if self.platform.is_windows() {
            "jextract.bat"
        } else {
            "jextract"
        }
    }

    /// Find the jextract version to use for a runtime version.
    ///
    /// A pinned runtime version maps to its dedicated release; every other
    /// version is clamped into `MIN_VERSION..=MAX_VERSION`.
    pub fn resolve_version(&self, runtime_version: u32) -> u32 {
        resolve_version(runtime_version)
    }

    /// Read and memoize an override file on the blocking pool.
    ///
    /// Lookups for the same file afterwards are served from memory, so async
    /// callers run this before [`resource`](Self::resource) and
    /// [`filename`](Self::filename).
    pub async fn load(&self, distributions: Option<&Path>) -> Result<()> {
        let Some(path) = distributions.map(Path::to_path_buf) else {
            return Ok(());
        };
        let cache = self.cache.clone();
        tokio::task::spawn_blocking(move || cache.properties(Some(&path)).map(drop))
            .await
            .map_err(|e| Error::Internal(format!("loading distribution data failed: {}", e)))?
    }

    /// The download resource for a jextract version on this platform.
    ///
    /// Uses the entry for the exact architecture if there is one and the x64
    /// entry of the same version and OS otherwise. The checksum must be a hex
    /// digest of its algorithm's length; a missing or malformed checksum is a
    /// configuration error, so nothing is fetched that could never verify.
    pub fn resource(&self, version: u32, distributions: Option<&Path>) -> Result<DownloadResource> {
        let data = self.cache.properties(distributions)?;
        let base = self.entry_key(&data, version)?;
        let url = url(&data, &base)?;

        let (key, checksum, algorithm) = CHECKSUM_SUFFIXES
            .iter()
            .find_map(|(suffix, algorithm)| {
                let key = format!("{base}.{suffix}");
                data.get(&key).map(|checksum| (key, checksum, *algorithm))
            })
            .ok_or_else(|| Error::MissingDistributionData {
                key: format!("{base}.{}", CHECKSUM_SUFFIXES[0].0),
            })?;
        if !is_hex_digest(checksum, algorithm) {
            return Err(Error::InvalidDistributionData {
                key,
                value: checksum.to_string(),
            });
        }

        DownloadResource::parse(url, checksum.trim(), algorithm)
    }

    /// The archive file name for a jextract version on this platform.
    ///
    /// Only needs the URL of the entry, not its checksum.
    pub fn filename(&self, version: u32, distributions: Option<&Path>) -> Result<String> {
        let data = self.cache.properties(distributions)?;
        let base = self.entry_key(&data, version)?;
        let url = url(&data, &base)?;
        let parsed = Url::parse(url).map_err(|e| Error::InvalidUrl(format!("{url}: {e}")))?;
        filename_from_url(&parsed)
    }

    /// Pick the key prefix of the entry to use, falling back to x64.
    fn entry_key(&self, data: &Properties, version: u32) -> Result<String> {
        let os = self.platform.operating_system.as_str();
        let exact = key(version, os, self.platform.architecture.as_str());
        if data.get(&format!("{exact}.url")).is_some() {
            return Ok(exact);
        }

        let fallback = key(version, os, Architecture::X64.as_str());
        if data.get(&format!("{fallback}.url")).is_some() {
            debug!("No distribution for {}, using {}", exact, fallback);
            return Ok(fallback);
        }

        Err(Error::MissingDistributionData {
            key: format!("{exact}.url"),
        })
    }
}

/// See [`DistributionStore::resolve_version`].
pub fn resolve_version(runtime_version: u32) -> u32 {
    if let Some((_, pinned)) = PINNED_VERSIONS
        .iter()
        .find(|(runtime, _)| *runtime == runtime_version)
    {
        return *pinned;
    }
    runtime_version.clamp(MIN_VERSION, MAX_VERSION)
}

fn url<'a>(data: &'a Properties, base: &str) -> Result<&'a str> {
    data.get(&format!("{base}.url"))
        .ok_or_else(|| Error::MissingDistributionData {
            key: format!("{base}.url"),
        })
}

/// Whether `checksum` is a hex digest of the length `algorithm` produces.
pub fn is_hex_digest(checksum: &str, algorithm: Algorithm) -> bool {
    let checksum = checksum.trim();
    checksum.len() == algorithm.hex_len() && checksum.chars().all(|c| c.is_ascii_hexdigit())
}

fn key(version: u32, os: &str, arch: &str) -> String {
    format!("{KEY_PREFIX}.{version}.{os}.{arch}")
}
