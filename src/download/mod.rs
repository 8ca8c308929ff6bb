//! Download module containing the Download & Verify client.
//!
//! The module is organized into three components:
//!
//! - [`resource`] - the [`DownloadResource`] describing what to fetch
//! - [`hash`] - digest algorithms and incremental hashing
//! - [`client`] - the [`DownloadClient`] that streams, hashes and verifies
//!
//! # Examples
//!
//! ```rust,no_run
//! use jextract_store::download::{Algorithm, DownloadClient, DownloadResource};
//! use jextract_store::http::HttpClientConfig;
//! use jextract_store::progress::ProgressBarOpts;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), jextract_store::Error> {
//! let resource = DownloadResource::parse(
//!     "https://example.com/jextract.tar.gz",
//!     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
//!     Algorithm::Sha256,
//! )?;
//! let client = DownloadClient::new(HttpClientConfig::default(), ProgressBarOpts::hidden())?;
//! let target = Path::new("downloads/jextract.tar.gz");
//! if !client.verify(&resource, target).await {
//!     client.download(&resource, target).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod hash;
pub mod resource;

pub use client::{verify, DownloadClient};
pub use hash::Algorithm;
pub use resource::DownloadResource;
