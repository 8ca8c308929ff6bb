//! The installation store.
//!
//! Build a [`JextractStore`] with a [`StoreBuilder`], then resolve
//! [`InstallationSelector`]s against it:
//!
//! - [`config`] - [`StoreConfig`] and its defaults
//! - [`builder`] - the fluent [`StoreBuilder`]
//! - [`store`] - resolution, caching and command execution
//!
//! On disk the store uses `<cache>/downloads/<archive>` for verified archives
//! and `<cache>/installation/<version>/` for extracted installations. Both may
//! be deleted at any time; the store re-resolves what is missing.
//!
//! [`InstallationSelector`]: crate::installation::InstallationSelector

pub mod builder;
pub mod config;
#[allow(clippy::module_inception)]
pub mod store;

pub use builder::StoreBuilder;
pub use config::{default_cache_dir, StoreConfig, CACHE_DIR_ENV, DISTRIBUTIONS_ENV};
pub use store::JextractStore;
