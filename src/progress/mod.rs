//! Download progress reporting.
//!
//! Archives are large, so the download client can report progress through an
//! `indicatif` bar. The store keeps the bar hidden unless asked otherwise,
//! since it usually runs inside a build whose output it should not disturb.
//!
//! ```rust
//! use jextract_store::progress::ProgressBarOpts;
//!
//! let hidden = ProgressBarOpts::hidden();
//! assert!(hidden.to_progress_bar(1024).is_hidden());
//! ```

pub mod style;

pub use style::ProgressBarOpts;
