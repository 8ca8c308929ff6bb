//! HTTP client setup.
//!
//! Archives are fetched through a `reqwest` client wrapped in middleware:
//! requests are traced with `reqwest-tracing`, and transient transport
//! failures can optionally be retried with exponential backoff. Connecting to
//! the server is bounded by a short timeout; reading the body is not.
//!
//! ```rust
//! use jextract_store::http::{create_http_client, HttpClientConfig};
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HttpClientConfig {
//!     connect_timeout: Duration::from_secs(5),
//!     ..HttpClientConfig::default()
//! };
//! let client = create_http_client(config)?;
//! # Ok(())
//! # }
//! ```

pub mod client;

pub use client::{create_http_client, HttpClientConfig, USER_AGENT};
