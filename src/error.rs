//! Error handling for the jextract store.
//!
//! Every resolution step reports failures through the single [`Error`] enum.
//! Any of these errors aborts the resolution attempt that produced it; nothing
//! is memoized for a failed attempt, so asking again for the same key starts
//! over from scratch.

use reqwest::{StatusCode, Url};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can happen while resolving or running jextract.
#[derive(Error, Debug)]
pub enum Error {
    /// Error from an underlying system.
    ///
    /// Captures failures that don't fit into other categories, such as a
    /// poisoned lock or a panicked blocking task.
    #[error("Internal error: {0}")]
    Internal(String),

    /// A URL from the distribution data cannot be parsed or has no file name.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Neither the platform specific nor the x64 fallback entry exists.
    ///
    /// This is a configuration error: the distribution data does not describe
    /// the requested jextract version for the current operating system.
    #[error("No distribution data for key \"{key}\" (nor its x64 fallback)")]
    MissingDistributionData { key: String },

    /// A distribution data value exists but cannot be used, such as a checksum
    /// that is not a hex digest of the algorithm's length.
    ///
    /// Like [`Error::MissingDistributionData`] this is a configuration error,
    /// reported before anything is downloaded.
    #[error("Invalid distribution data for key \"{key}\": {value:?}")]
    InvalidDistributionData { key: String, value: String },

    /// The server answered with something other than `200 OK`.
    #[error("Downloading from {url} failed with status code {status}")]
    Download { url: Url, status: StatusCode },

    /// The downloaded bytes do not match the expected checksum.
    ///
    /// The partially written file has already been removed when this is
    /// returned.
    #[error("Data integrity of downloaded file {url} could not be verified, checksums do not match")]
    Integrity { url: Url },

    /// The digest algorithm named by a resource is not supported.
    #[error("Unsupported digest algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// An archive could not be unpacked into the installation directory.
    #[error("Failed to extract {}", archive.display())]
    Extraction {
        archive: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No executable `bin/<filename>` exists below the given root.
    #[error("Executable bin/{filename} not found below {}", root.display())]
    ExecutableNotFound { root: PathBuf, filename: String },

    /// The version probe printed nothing matching `jextract <digits>`.
    #[error("Couldn't parse jextract version from output: {output:?}")]
    VersionParse { output: String },

    /// A local root could not be resolved to a working installation.
    #[error("{} does not contain a valid jextract installation", root.display())]
    InvalidInstallation {
        root: PathBuf,
        #[source]
        source: Box<Error>,
    },

    /// The jextract process could not be started.
    ///
    /// A process that starts and exits with a non-zero status is not an
    /// error; its output is handed back to the caller untouched.
    #[error("Failed to run {}", program.display())]
    Process {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    /// I/O Error.
    #[error("I/O error")]
    IOError {
        #[from]
        source: io::Error,
    },

    /// Error from the Reqwest library.
    #[error("Reqwest Error")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },

    /// Error from the HTTP middleware stack.
    #[error("HTTP middleware error")]
    Middleware {
        #[from]
        source: reqwest_middleware::Error,
    },
}

/// Result type alias for operations that can fail with an [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
