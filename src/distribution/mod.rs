//! Distribution metadata.
//!
//! Maps a jextract version and the current [`Platform`](crate::platform::Platform)
//! to a [`DownloadResource`](crate::download::DownloadResource). The data comes
//! from a flat properties document bundled with the crate, optionally
//! overridden by a user supplied file of the same shape:
//!
//! ```text
//! jextract.22.linux.x64.url=https://.../openjdk-22-jextract+6-47_linux-x64_bin.tar.gz
//! jextract.22.linux.x64.sha-256=<hex digest>
//! ```
//!
//! Keys missing from the override file are looked up in the bundled data, and
//! a missing architecture falls back to the x64 entry of the same OS.
//!
//! ```rust
//! use jextract_store::distribution::resolve_version;
//!
//! assert_eq!(resolve_version(25), 25);
//! assert_eq!(resolve_version(30), 22);
//! assert_eq!(resolve_version(10), 19);
//! ```

pub mod properties;
pub mod resolver;

pub use properties::{Properties, PropertiesCache};
pub use resolver::{resolve_version, DistributionStore, MAX_VERSION, MIN_VERSION, PINNED_VERSIONS};
