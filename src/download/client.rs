//! Checksum-verified downloads.
//!
//! [`DownloadClient::download`] streams a response body into a temporary file
//! next to the target while hashing it, and moves it into place only once the
//! digest matches. A reader of the target never sees a partial archive.
//! [`DownloadClient::verify`] re-hashes a file that is already on disk; it is
//! the cheap pre-check that decides whether a download can be skipped.

use super::hash::{checksum_matches, file_digest, Hasher};
use super::resource::DownloadResource;
use crate::error::{Error, Result};
use crate::http::{create_http_client, HttpClientConfig};
use crate::progress::ProgressBarOpts;

use futures::StreamExt;
use reqwest::StatusCode;
use reqwest_middleware::ClientWithMiddleware;
use std::fmt;
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, info};

/// Fetches [`DownloadResource`]s and checks their integrity.
#[derive(Clone)]
pub struct DownloadClient {
    client: ClientWithMiddleware,
    progress: ProgressBarOpts,
}

impl fmt::Debug for DownloadClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadClient")
            .field("progress", &self.progress)
            .finish()
    }
}

impl DownloadClient {
    /// Create a client from an HTTP configuration.
    pub fn new(config: HttpClientConfig, progress: ProgressBarOpts) -> Result<Self> {
        let client = create_http_client(config)?;
        Ok(Self::with_client(client, progress))
    }

    /// Create a client around an existing middleware stack.
    pub fn with_client(client: ClientWithMiddleware, progress: ProgressBarOpts) -> Self {
        Self { client, progress }
    }

    /// Download `resource` to `target`, verifying its checksum.
    ///
    /// Parent directories of `target` are created as needed and an existing
    /// file is replaced. A non-200 response fails before anything is written.
    /// The body goes to a temporary file in the same directory, which becomes
    /// `target` only if its digest matches; otherwise it is removed, `target`
    /// is left as it was, and [`Error::Integrity`] is returned.
    pub async fn download(&self, resource: &DownloadResource, target: &Path) -> Result<()> {
        debug!("Fetching {}", &resource.url);
        let res = self.client.get(resource.url.clone()).send().await?;

        let status = res.status();
        if status != StatusCode::OK {
            return Err(Error::Download {
                url: resource.url.clone(),
                status,
            });
        }

        let parent = match target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        debug!("Creating destination directory {:?}", parent);
        fs::create_dir_all(&parent).await?;

        let (file, part) = partial_file(&parent, target).await?;

        let pb = self.progress.to_progress_bar(res.content_length().unwrap_or(0));
        if let Ok(name) = resource.filename() {
            pb.set_message(name);
        }
        let written = self.write_verified(resource, res, file, &pb).await;
        self.progress.finish(&pb);
        // Dropping `part` on error removes the temporary file.
        written?;

        part.persist(target).map_err(|e| e.error)?;
        info!("Downloaded {} to {:?}", resource.url, target);
        Ok(())
    }

    async fn write_verified(
        &self,
        resource: &DownloadResource,
        res: reqwest::Response,
        mut file: fs::File,
        pb: &indicatif::ProgressBar,
    ) -> Result<()> {
        let mut hasher = Hasher::new(resource.algorithm);

        let mut stream = res.bytes_stream();
        while let Some(item) = stream.next().await {
            let mut chunk = item?;
            hasher.update(&chunk);
            pb.inc(chunk.len() as u64);
            file.write_all_buf(&mut chunk).await?;
        }
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        let calculated = hasher.finalize_hex();
        if !checksum_matches(&resource.checksum, &calculated) {
            debug!(
                "Checksum mismatch for {}: expected {}, got {}",
                resource.url, resource.checksum, calculated
            );
            return Err(Error::Integrity {
                url: resource.url.clone(),
            });
        }
        Ok(())
    }

    /// Check that `file` holds exactly the bytes described by `resource`.
    ///
    /// Returns `false` without touching the disk if the file does not exist,
    /// and `false` for any error while reading it.
    pub async fn verify(&self, resource: &DownloadResource, file: &Path) -> bool {
        verify(resource, file).await
    }
}

/// Create a hidden `.<name>.XXXXXX.part` file in `dir` for downloading `target`.
async fn partial_file(dir: &Path, target: &Path) -> Result<(fs::File, TempPath)> {
    let prefix = format!(
        ".{}.",
        target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "download".into())
    );
    let dir = dir.to_path_buf();
    let named = tokio::task::spawn_blocking(move || {
        tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".part")
            .tempfile_in(&dir)
    })
    .await
    .map_err(|e| Error::Internal(format!("temporary file task failed: {}", e)))??;

    debug!("Creating temporary file {:?}", named.path());
    let (file, path) = named.into_parts();
    Ok((fs::File::from_std(file), path))
}

/// Free-standing form of [`DownloadClient::verify`].
pub async fn verify(resource: &DownloadResource, file: &Path) -> bool {
    if !file.exists() {
        return false;
    }
    match file_digest(file, resource.algorithm).await {
        Ok(calculated) => checksum_matches(&resource.checksum, &calculated),
        Err(e) => {
            debug!("Could not hash {:?}: {}", file, e);
            false
        }
    }
}
