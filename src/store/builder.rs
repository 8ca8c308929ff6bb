//! Builder pattern implementation for creating JextractStore instances.
//!
//! # Examples
//!
//! ```rust
//! use jextract_store::store::StoreBuilder;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), jextract_store::Error> {
//! let store = StoreBuilder::new()
//!     .cache_dir(PathBuf::from("build/jextract"))
//!     .distributions(PathBuf::from("jextract.properties"))
//!     .retries(2)
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use super::config::{StoreConfig, CACHE_DIR_ENV, DISTRIBUTIONS_ENV};
use super::store::JextractStore;
use crate::error::Result;
use crate::platform::Platform;
use crate::progress::ProgressBarOpts;

use reqwest::header::{HeaderMap, HeaderValue, IntoHeaderName};
use reqwest::Proxy;
use std::path::PathBuf;
use std::time::Duration;

/// A builder used to create a [`JextractStore`].
#[derive(Debug, Default)]
pub struct StoreBuilder {
    config: StoreConfig,
}

impl StoreBuilder {
    /// Creates a builder with the default options.
    pub fn new() -> Self {
        StoreBuilder::default()
    }

    /// Creates a builder seeded from the environment.
    ///
    /// `JEXTRACT_STORE_CACHE_DIR` replaces the cache root and
    /// `JEXTRACT_STORE_DISTRIBUTIONS` names a distribution override file.
    /// Unset or empty variables leave the defaults in place.
    pub fn from_env() -> Self {
        let mut builder = StoreBuilder::default();
        if let Some(dir) = env_path(CACHE_DIR_ENV) {
            builder.config.cache_dir = dir;
        }
        if let Some(file) = env_path(DISTRIBUTIONS_ENV) {
            builder.config.distributions = Some(file);
        }
        builder
    }

    /// Sets the root of the on-disk cache.
    pub fn cache_dir(mut self, cache_dir: PathBuf) -> Self {
        self.config.cache_dir = cache_dir;
        self
    }

    /// Layer a properties file over the bundled distribution data.
    pub fn distributions(mut self, distributions: PathBuf) -> Self {
        self.config.distributions = Some(distributions);
        self
    }

    /// Select archives for another platform than the running one.
    pub fn platform(mut self, platform: Platform) -> Self {
        self.config.platform = platform;
        self
    }

    /// Set the number of retries for transient HTTP failures.
    pub fn retries(mut self, retries: u32) -> Self {
        self.config.http.retries = retries;
        self
    }

    /// Set the connect timeout of the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.http.connect_timeout = timeout;
        self
    }

    /// Route all requests through a proxy.
    pub fn proxy(mut self, proxy: Proxy) -> Self {
        self.config.http.proxy = Some(proxy);
        self
    }

    /// Add http headers sent with every request.
    ///
    /// Calling `.headers()` multiple times merges all maps into one.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        let mut new = self.new_header();
        new.extend(headers);
        self.config.http.headers = Some(new);
        self
    }

    /// Add a single http header sent with every request.
    pub fn header<K: IntoHeaderName>(mut self, name: K, value: HeaderValue) -> Self {
        let mut new = self.new_header();
        new.insert(name, value);
        self.config.http.headers = Some(new);
        self
    }

    /// Set the download progress bar options.
    pub fn progress(mut self, progress: ProgressBarOpts) -> Self {
        self.config.progress = progress;
        self
    }

    /// The configuration built so far.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn new_header(&self) -> HeaderMap {
        match self.config.http.headers {
            Some(ref h) => h.to_owned(),
            _ => HeaderMap::new(),
        }
    }

    /// Create the [`JextractStore`] with the specified options.
    pub fn build(self) -> Result<JextractStore> {
        JextractStore::new(self.config)
    }
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{Architecture, OperatingSystem};
    use reqwest::header::{ACCEPT, USER_AGENT};

    #[test]
    fn test_builder_setters() {
        let platform = Platform::new(OperatingSystem::Mac, Architecture::Aarch64);
        let builder = StoreBuilder::new()
            .cache_dir(PathBuf::from("cache"))
            .distributions(PathBuf::from("dist.properties"))
            .platform(platform)
            .retries(3)
            .connect_timeout(Duration::from_secs(2));

        let config = builder.config();
        assert_eq!(config.cache_dir, PathBuf::from("cache"));
        assert_eq!(config.distributions, Some(PathBuf::from("dist.properties")));
        assert_eq!(config.platform, platform);
        assert_eq!(config.http.retries, 3);
        assert_eq!(config.http.connect_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_headers_are_merged() {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/gzip"));

        let builder = StoreBuilder::new()
            .header(USER_AGENT, HeaderValue::from_static("build/1.0"))
            .headers(headers);

        let merged = builder.config().http.headers.as_ref().unwrap();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.get(USER_AGENT).unwrap(), "build/1.0");
        assert_eq!(merged.get(ACCEPT).unwrap(), "application/gzip");
    }

    #[test]
    fn test_env_path_ignores_unset() {
        assert_eq!(env_path("JEXTRACT_STORE_TEST_SURELY_UNSET_VARIABLE"), None);
    }
}
