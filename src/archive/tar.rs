//! Tarball extraction.

use crate::error::{Error, Result};

use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Archive formats that can be unpacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// `.tar.gz` or `.tgz`
    TarGz,
    /// Uncompressed `.tar`
    Tar,
}

impl ArchiveFormat {
    /// Guess the format from a file name, defaulting to gzip-compressed tar.
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if name.ends_with(".tar") {
            Self::Tar
        } else {
            Self::TarGz
        }
    }
}

/// Extract `archive` into `dest`.
///
/// `dest` appears only after the archive was unpacked completely. Every call
/// stages into its own hidden sibling directory, so concurrent extractions of
/// the same archive, even from other processes, never see each other's
/// partial output.
pub async fn extract(archive: &Path, dest: &Path) -> Result<()> {
    let archive = archive.to_path_buf();
    let dest = dest.to_path_buf();
    tokio::task::spawn_blocking(move || extract_blocking(&archive, &dest))
        .await
        .map_err(|e| Error::Internal(format!("extraction task failed: {}", e)))?
}

fn extract_blocking(archive: &Path, dest: &Path) -> Result<()> {
    let wrap = |source: io::Error| Error::Extraction {
        archive: archive.to_path_buf(),
        source,
    };

    let parent = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(wrap)?;
    let staging = tempfile::Builder::new()
        .prefix(&staging_prefix(dest))
        .suffix(".tmp")
        .tempdir_in(&parent)
        .map_err(wrap)?;

    debug!("Extracting {:?} into {:?}", archive, staging.path());
    unpack(archive, staging.path()).map_err(wrap)?;

    if let Err(e) = fs::rename(staging.path(), dest) {
        // Someone else finished the same installation first.
        if dest.is_dir() {
            debug!("{:?} appeared during extraction, keeping it", dest);
            return Ok(());
        }
        return Err(wrap(e));
    }

    info!("Extracted {:?} to {:?}", archive, dest);
    Ok(())
}

fn unpack(archive: &Path, into: &Path) -> io::Result<()> {
    let reader = BufReader::new(File::open(archive)?);
    let reader: Box<dyn Read> = match ArchiveFormat::from_path(archive) {
        ArchiveFormat::TarGz => Box::new(GzDecoder::new(reader)),
        ArchiveFormat::Tar => Box::new(reader),
    };
    ::tar::Archive::new(reader).unpack(into)
}

/// Prefix of the hidden sibling directories `dest` is staged in.
fn staging_prefix(dest: &Path) -> String {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "extract".into());
    format!(".{}.", name)
}
