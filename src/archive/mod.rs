//! Archive extraction.
//!
//! jextract is distributed as gzip-compressed tarballs. Extraction goes into a
//! hidden sibling directory first and is renamed into place only once every
//! entry has been written, so an installation directory that exists is always
//! complete.

pub mod tar;

pub use self::tar::{extract, ArchiveFormat};
