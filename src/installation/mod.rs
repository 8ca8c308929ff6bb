//! Installations of jextract.
//!
//! An [`Installation`] is a verified, runnable copy of jextract: its root
//! directory, the launcher inside it and the jextract major version. A
//! [`RemoteInstallation`] additionally remembers which archive it was
//! unpacked from. Callers choose an installation through an
//! [`InstallationSelector`].

pub mod discovery;

pub use discovery::{find_executable, parse_executable_version, probe_version};

use crate::download::DownloadResource;

use std::path::{Path, PathBuf};

/// A verified, runnable jextract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installation {
    /// Directory the installation lives in.
    pub root: PathBuf,
    /// The `bin/jextract` launcher below `root`.
    pub executable: PathBuf,
    /// jextract major version.
    pub version: u32,
}

/// An installation that was downloaded and unpacked by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteInstallation {
    /// What was downloaded.
    pub resource: DownloadResource,
    /// Where the verified archive is kept.
    pub archive: PathBuf,
    /// The unpacked installation.
    pub installation: Installation,
}

/// Which jextract to run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InstallationSelector {
    /// Download the jextract release matching a runtime major version.
    Remote { runtime_version: u32 },
    /// Use jextract already installed below a directory.
    Local { root: PathBuf },
}

impl InstallationSelector {
    pub fn remote(runtime_version: u32) -> Self {
        Self::Remote { runtime_version }
    }

    pub fn local(root: impl AsRef<Path>) -> Self {
        Self::Local {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl From<u32> for InstallationSelector {
    fn from(runtime_version: u32) -> Self {
        Self::remote(runtime_version)
    }
}

impl From<PathBuf> for InstallationSelector {
    fn from(root: PathBuf) -> Self {
        Self::Local { root }
    }
}

impl From<&Path> for InstallationSelector {
    fn from(root: &Path) -> Self {
        Self::local(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_conversions() {
        assert_eq!(
            InstallationSelector::from(22),
            InstallationSelector::Remote { runtime_version: 22 }
        );
        assert_eq!(
            InstallationSelector::from(Path::new("/opt/jextract")),
            InstallationSelector::Local {
                root: PathBuf::from("/opt/jextract")
            }
        );
        assert_eq!(
            InstallationSelector::from(PathBuf::from("/opt/jextract")),
            InstallationSelector::local("/opt/jextract")
        );
    }
}
