//! Core store implementation with resolution logic.
//!
//! [`JextractStore`] turns an [`InstallationSelector`] into a runnable
//! [`Installation`] and runs it. Successful resolutions are memoized per key
//! for the lifetime of the store; failed ones are not, so the next request for
//! the same key starts over.
//!
//! # Examples
//!
//! ```rust,no_run
//! use jextract_store::generator::GenerateBindings;
//! use jextract_store::store::StoreBuilder;
//! use jextract_store::InstallationSelector;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = StoreBuilder::from_env().build()?;
//! let selector = InstallationSelector::remote(22);
//!
//! let bindings = GenerateBindings::new("include/bass.h", "build/generated");
//! let output = store.generate(&selector, &bindings).await?;
//! if !output.status.success() {
//!     eprintln!("{}", String::from_utf8_lossy(&output.stderr));
//! }
//! # Ok(())
//! # }
//! ```

use super::builder::StoreBuilder;
use super::config::StoreConfig;
use crate::archive::extract;
use crate::distribution::DistributionStore;
use crate::download::DownloadClient;
use crate::error::{Error, Result};
use crate::generator::{DumpIncludes, GenerateBindings, GeneratorArgs};
use crate::installation::{
    find_executable, probe_version, Installation, InstallationSelector, RemoteInstallation,
};

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::Arc;
use tokio::fs;
use tokio::process::Command;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info};

/// One lazily initialised slot per key.
type Cells<K, V> = Mutex<HashMap<K, Arc<OnceCell<V>>>>;

/// Resolves, caches and runs jextract installations.
///
/// Resolution of a single key happens at most once at a time: concurrent
/// callers asking for the same key wait for the same attempt and observe the
/// same result.
pub struct JextractStore {
    config: StoreConfig,
    distributions: DistributionStore,
    client: DownloadClient,
    remote: Cells<u32, RemoteInstallation>,
    local: Cells<PathBuf, Installation>,
}

impl fmt::Debug for JextractStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JextractStore")
            .field("config", &self.config)
            .field("client", &self.client)
            .finish()
    }
}

impl JextractStore {
    /// Create a store from a configuration.
    pub fn new(config: StoreConfig) -> Result<Self> {
        let distributions = DistributionStore::new(config.platform);
        let client = DownloadClient::new(config.http.clone(), config.progress.clone())?;
        Ok(Self {
            config,
            distributions,
            client,
            remote: Mutex::new(HashMap::new()),
            local: Mutex::new(HashMap::new()),
        })
    }

    /// Shortcut for [`StoreBuilder::new`].
    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The distribution data lookup used by this store.
    pub fn distributions(&self) -> &DistributionStore {
        &self.distributions
    }

    /// Where downloaded archives are kept.
    pub fn downloads_dir(&self) -> PathBuf {
        self.config.downloads_dir()
    }

    /// Where archives are extracted, one directory per jextract version.
    pub fn installation_dir(&self) -> PathBuf {
        self.config.installation_dir()
    }

    /// Resolve any selector to an installation.
    pub async fn resolve(&self, selector: &InstallationSelector) -> Result<Installation> {
        match selector {
            InstallationSelector::Remote { runtime_version } => Ok(self
                .resolve_remote(*runtime_version)
                .await?
                .installation),
            InstallationSelector::Local { root } => self.resolve_local(root).await,
        }
    }

    /// The jextract version a selector stands for.
    ///
    /// For a remote selector this is the version the runtime maps to and
    /// nothing is downloaded. A local installation is resolved and probed.
    pub async fn version(&self, selector: &InstallationSelector) -> Result<u32> {
        match selector {
            InstallationSelector::Remote { runtime_version } => {
                Ok(self.distributions.resolve_version(*runtime_version))
            }
            InstallationSelector::Local { root } => Ok(self.resolve_local(root).await?.version),
        }
    }

    /// Resolve jextract installed below `root`.
    ///
    /// Any failure is reported as [`Error::InvalidInstallation`] naming `root`.
    pub async fn resolve_local(&self, root: &Path) -> Result<Installation> {
        let cell = cell(&self.local, root.to_path_buf()).await;
        if let Some(installation) = cell.get() {
            debug!("Using cached installation {:?}", root);
            return Ok(installation.clone());
        }

        let installation = cell
            .get_or_try_init(|| self.probe_local(root))
            .await
            .map_err(|source| Error::InvalidInstallation {
                root: root.to_path_buf(),
                source: Box::new(source),
            })?;
        Ok(installation.clone())
    }

    /// Download and install the jextract release for a runtime version.
    pub async fn resolve_remote(&self, runtime_version: u32) -> Result<RemoteInstallation> {
        let version = self.distributions.resolve_version(runtime_version);
        debug!("Runtime {} uses jextract {}", runtime_version, version);

        let cell = cell(&self.remote, version).await;
        if let Some(remote) = cell.get() {
            debug!("Using cached jextract {}", version);
            return Ok(remote.clone());
        }

        let remote = cell.get_or_try_init(|| self.install(version)).await?;
        Ok(remote.clone())
    }

    /// Resolve `selector` and run its executable.
    ///
    /// `configure` receives the resolved installation and a command for its
    /// executable, to add arguments, a working directory or stdio settings.
    /// The process output is returned as is, whatever its exit status.
    pub async fn exec<F>(&self, selector: &InstallationSelector, configure: F) -> Result<Output>
    where
        F: FnOnce(&Installation, &mut Command),
    {
        let installation = self.resolve(selector).await?;
        let mut command = Command::new(&installation.executable);
        configure(&installation, &mut command);

        debug!("Running {:?}", command);
        let output = command.output().await.map_err(|source| Error::Process {
            program: installation.executable.clone(),
            source,
        })?;
        debug!("{:?} exited with {}", installation.executable, output.status);
        Ok(output)
    }

    /// Run jextract with arguments for the resolved version.
    pub async fn run<A>(&self, selector: &InstallationSelector, args: &A) -> Result<Output>
    where
        A: GeneratorArgs + ?Sized,
    {
        self.exec(selector, |installation, command| {
            command.args(args.args(installation.version));
        })
        .await
    }

    /// Generate bindings for a header.
    pub async fn generate(
        &self,
        selector: &InstallationSelector,
        bindings: &GenerateBindings,
    ) -> Result<Output> {
        info!("Generating bindings for {:?}", bindings.header);
        self.run(selector, bindings).await
    }

    /// Dump the symbols a header declares into an arg file.
    pub async fn dump_includes(
        &self,
        selector: &InstallationSelector,
        dump: &DumpIncludes,
    ) -> Result<Output> {
        info!("Dumping includes of {:?} to {:?}", dump.header, dump.arg_file);
        if let Some(parent) = dump.arg_file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        self.run(selector, dump).await
    }

    /// Remove the cached installation and archive of a jextract version.
    ///
    /// Returns whether anything was deleted. The next resolution of this
    /// version downloads and extracts again.
    pub async fn uninstall(&self, version: u32) -> Result<bool> {
        let forgotten = self.remote.lock().await.remove(&version);
        let archive = match forgotten.as_ref().and_then(|cell| cell.get()) {
            Some(remote) => Some(remote.archive.clone()),
            None => {
                let distributions = self.config.distributions.as_deref();
                match self.distributions.load(distributions).await {
                    Ok(()) => self
                        .distributions
                        .filename(version, distributions)
                        .ok()
                        .map(|filename| self.downloads_dir().join(filename)),
                    Err(_) => None,
                }
            }
        };

        let mut removed = false;
        let root = self.installation_dir().join(version.to_string());
        if root.exists() {
            debug!("Removing {:?}", root);
            fs::remove_dir_all(&root).await?;
            removed = true;
        }
        if let Some(archive) = archive.filter(|a| a.exists()) {
            debug!("Removing {:?}", archive);
            fs::remove_file(&archive).await?;
            removed = true;
        }

        if removed {
            info!("Uninstalled jextract {}", version);
        }
        Ok(removed)
    }

    /// Uninstall every jextract version this store has resolved.
    ///
    /// Returns the number of versions that had something to delete.
    pub async fn clean(&self) -> Result<usize> {
        let versions: Vec<u32> = self.remote.lock().await.keys().copied().collect();
        let mut count = 0;
        for version in versions {
            if self.uninstall(version).await? {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Drop the memoized resolution of a local installation.
    ///
    /// Returns whether there was one.
    pub async fn forget_local(&self, root: &Path) -> bool {
        self.local.lock().await.remove(root).is_some()
    }

    async fn probe_local(&self, root: &Path) -> Result<Installation> {
        info!("Resolving jextract installation {:?}", root);
        let executable = self.find_executable(root).await?;
        let version = probe_version(&executable).await?;
        info!("Found jextract {} at {:?}", version, executable);
        Ok(Installation {
            root: root.to_path_buf(),
            executable,
            version,
        })
    }

    async fn install(&self, version: u32) -> Result<RemoteInstallation> {
        let distributions = self.config.distributions.as_deref();
        self.distributions.load(distributions).await?;
        let resource = self.distributions.resource(version, distributions)?;
        let archive = self
            .downloads_dir()
            .join(self.distributions.filename(version, distributions)?);

        if self.client.verify(&resource, &archive).await {
            debug!("{:?} is verified, skipping download", archive);
        } else {
            info!("Downloading jextract {} from {}", version, resource.url);
            self.client.download(&resource, &archive).await?;
        }

        let root = self.installation_dir().join(version.to_string());
        if root.exists() {
            debug!("{:?} already exists, skipping extraction", root);
        } else {
            info!("Extracting jextract {} to {:?}", version, root);
            extract(&archive, &root).await?;
        }

        let executable = self.find_executable(&root).await?;
        info!("Installed jextract {} at {:?}", version, executable);
        Ok(RemoteInstallation {
            resource,
            archive,
            installation: Installation {
                root,
                executable,
                version,
            },
        })
    }

    async fn find_executable(&self, root: &Path) -> Result<PathBuf> {
        let root = root.to_path_buf();
        let filename = self.distributions.executable_filename();
        tokio::task::spawn_blocking(move || find_executable(&root, filename))
            .await
            .map_err(|e| Error::Internal(format!("executable search failed: {}", e)))?
    }
}

async fn cell<K, V>(cells: &Cells<K, V>, key: K) -> Arc<OnceCell<V>>
where
    K: Eq + Hash,
{
    cells.lock().await.entry(key).or_default().clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{Architecture, OperatingSystem, Platform};

    fn store(cache: &Path) -> JextractStore {
        StoreBuilder::new()
            .cache_dir(cache.to_path_buf())
            .platform(Platform::new(OperatingSystem::Linux, Architecture::X64))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_remote_version_does_not_resolve() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        assert_eq!(store.version(&InstallationSelector::remote(25)).await.unwrap(), 25);
        assert_eq!(store.version(&InstallationSelector::remote(23)).await.unwrap(), 22);
        assert!(!store.downloads_dir().exists());
    }

    #[tokio::test]
    async fn test_local_failure_names_root_and_is_not_memoized() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let root = dir.path().join("jdk");
        std::fs::create_dir_all(&root).unwrap();

        let err = store.resolve_local(&root).await.unwrap_err();
        match err {
            Error::InvalidInstallation { root: ref r, ref source } => {
                assert_eq!(r, &root);
                assert!(matches!(**source, Error::ExecutableNotFound { .. }));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(err.to_string().contains("does not contain a valid jextract installation"));
        assert!(!store.local.lock().await[&root].initialized());
    }

    #[tokio::test]
    async fn test_uninstall_unknown_version() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        assert!(!store.uninstall(22).await.unwrap());
        assert_eq!(store.clean().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_forget_local() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let _ = store.resolve_local(dir.path()).await;
        assert!(store.forget_local(dir.path()).await);
        assert!(!store.forget_local(dir.path()).await);
    }
}
