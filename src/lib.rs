//! jextract-store downloads, verifies, caches and runs installations of the
//! `jextract` binding generator.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use jextract_store::{Error, InstallationSelector, StoreBuilder};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Error> {
//! let store = StoreBuilder::new().build()?;
//! let installation = store.resolve(&InstallationSelector::remote(22)).await?;
//! println!("jextract {} at {:?}", installation.version, installation.executable);
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`platform`] - Detection of the operating system and architecture
//! - [`distribution`] - Distribution data lookup and the runtime to jextract version mapping
//! - [`download`] - Checksum-verified downloads
//! - [`http`] - HTTP client construction
//! - [`progress`] - Download progress bar styling
//! - [`archive`] - Atomic archive extraction
//! - [`installation`] - Installation types, executable discovery and version probing
//! - [`store`] - The memoizing [`JextractStore`] and its builder
//! - [`generator`] - jextract command line arguments
//! - [`error`] - Centralized error handling with the `Error` enum

pub mod archive;
pub mod distribution;
pub mod download;
pub mod error;
pub mod generator;
pub mod http;
pub mod installation;
pub mod platform;
pub mod progress;
pub mod store;

pub use distribution::{resolve_version, DistributionStore};
pub use download::{Algorithm, DownloadClient, DownloadResource};
pub use error::{Error, Result};
pub use generator::{DumpIncludes, GenerateBindings, GeneratorArgs, IncludeKind};
pub use http::{create_http_client, HttpClientConfig};
pub use installation::{Installation, InstallationSelector, RemoteInstallation};
pub use platform::{Architecture, OperatingSystem, Platform};
pub use progress::ProgressBarOpts;
pub use store::{JextractStore, StoreBuilder, StoreConfig};
