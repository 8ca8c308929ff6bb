//! Configuration structures and defaults for the store.
//!
//! [`StoreConfig`] collects everything a [`JextractStore`] needs to know
//! before it resolves anything: where the cache lives, which distribution
//! data to consult, which platform to download for, and how to talk HTTP.
//!
//! ```rust
//! use jextract_store::store::StoreConfig;
//! use std::path::PathBuf;
//!
//! let config = StoreConfig {
//!     cache_dir: PathBuf::from("build/jextract"),
//!     ..StoreConfig::default()
//! };
//! assert_eq!(config.downloads_dir(), PathBuf::from("build/jextract/downloads"));
//! assert_eq!(config.installation_dir(), PathBuf::from("build/jextract/installation"));
//! ```
//!
//! [`JextractStore`]: super::JextractStore

use crate::http::HttpClientConfig;
use crate::platform::Platform;
use crate::progress::ProgressBarOpts;

use std::path::PathBuf;

/// Environment variable overriding the cache root.
pub const CACHE_DIR_ENV: &str = "JEXTRACT_STORE_CACHE_DIR";

/// Environment variable naming a distribution override file.
pub const DISTRIBUTIONS_ENV: &str = "JEXTRACT_STORE_DISTRIBUTIONS";

/// Directory below the cache root holding downloaded archives.
pub const DOWNLOADS_DIR: &str = "downloads";

/// Directory below the cache root holding one extracted installation per version.
pub const INSTALLATION_DIR: &str = "installation";

/// Configuration structure for the store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Root of the on-disk cache.
    pub cache_dir: PathBuf,
    /// Optional properties file layered over the bundled distribution data.
    pub distributions: Option<PathBuf>,
    /// The platform archives are selected for.
    pub platform: Platform,
    /// HTTP client settings.
    pub http: HttpClientConfig,
    /// Download progress bar settings.
    pub progress: ProgressBarOpts,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            distributions: None,
            platform: Platform::current(),
            http: HttpClientConfig::default(),
            progress: ProgressBarOpts::hidden(),
        }
    }
}

impl StoreConfig {
    /// `<cache_dir>/downloads`
    pub fn downloads_dir(&self) -> PathBuf {
        self.cache_dir.join(DOWNLOADS_DIR)
    }

    /// `<cache_dir>/installation`
    pub fn installation_dir(&self) -> PathBuf {
        self.cache_dir.join(INSTALLATION_DIR)
    }
}

/// The user cache directory, or the temp directory where there is none.
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("jextract-store")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert!(config.cache_dir.ends_with("jextract-store"));
        assert!(config.distributions.is_none());
        assert_eq!(config.platform, Platform::current());
        assert_eq!(config.http.retries, 0);
        assert!(!config.progress.is_enabled());
    }
}
