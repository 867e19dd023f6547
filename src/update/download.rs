//! Artifact download with at-most-once semantics per destination

use std::path::{Path, PathBuf};

use reqwest::StatusCode;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::error::DownloadError;
use crate::provider::http::{build_client, last_segment};

/// What [`DownloadManager::ensure`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Downloads are disabled or the release has no download link
    Skipped,
    /// The destination was already present and left untouched
    Exists,
    /// The artifact was fetched and written to the destination
    Downloaded,
}

/// Pulls release artifacts into the local filesystem
pub struct DownloadManager {
    client: reqwest::Client,
    enabled: bool,
}

impl DownloadManager {
    pub fn new(enabled: bool) -> Self {
        Self {
            client: build_client(),
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Make sure the artifact behind `link` exists at `destination`.
    ///
    /// An existing destination is never re-fetched or overwritten. The body
    /// is written to a `.part` sibling first and moved into place, so a
    /// failed transfer never leaves a partial file at `destination`.
    pub async fn ensure(
        &self,
        link: Option<&str>,
        destination: &Path,
    ) -> Result<DownloadOutcome, DownloadError> {
        let Some(link) = link.filter(|_| self.enabled) else {
            debug!("Download skipped for {:?}", destination);
            return Ok(DownloadOutcome::Skipped);
        };

        if file_exists(destination).await? {
            debug!("{:?} already exists", destination);
            return Ok(DownloadOutcome::Exists);
        }

        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DownloadError::io("Failed to create directory", parent, e))?;
        }

        info!("Downloading {} to {:?}", link, destination);

        let mut response = self.client.get(link).send().await?;
        if response.status() != StatusCode::OK {
            return Err(DownloadError::HttpStatus(response.status()));
        }

        let partial = partial_path(destination);
        let written = match write_partial(&mut response, &partial, destination).await {
            Ok(written) => written,
            Err(e) => {
                discard_partial(&partial).await;
                return Err(e);
            }
        };

        if !file_exists(destination).await? {
            return Err(DownloadError::NotWritten(destination.to_path_buf()));
        }

        info!("Download complete: {} bytes", written);
        Ok(DownloadOutcome::Downloaded)
    }
}

/// Stream the body into `partial`, then move it to `destination`
async fn write_partial(
    response: &mut reqwest::Response,
    partial: &Path,
    destination: &Path,
) -> Result<u64, DownloadError> {
    let mut file = tokio::fs::File::create(partial)
        .await
        .map_err(|e| DownloadError::io("Failed to create", partial, e))?;

    let mut written: u64 = 0;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io("Failed to write", partial, e))?;
        written += chunk.len() as u64;
    }

    file.flush()
        .await
        .map_err(|e| DownloadError::io("Failed to flush", partial, e))?;
    drop(file);

    tokio::fs::rename(partial, destination)
        .await
        .map_err(|e| DownloadError::io("Failed to move download into", destination, e))?;

    Ok(written)
}

async fn discard_partial(partial: &Path) {
    match tokio::fs::remove_file(partial).await {
        Ok(()) => debug!("Removed incomplete download {:?}", partial),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove incomplete download {:?}: {}", partial, e),
    }
}

/// Destination for a download link: its last path segment inside `dir`
pub fn destination_for(link: &str, dir: &Path) -> Option<PathBuf> {
    last_segment(link).map(|name| dir.join(name))
}

async fn file_exists(path: &Path) -> Result<bool, DownloadError> {
    tokio::fs::try_exists(path)
        .await
        .map_err(|e| DownloadError::io("Failed to inspect", path, e))
}

fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use tempfile::TempDir;

    #[tokio::test]
    async fn ensure_downloads_once_then_reports_exists() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/files/plugin.jar")
            .with_status(200)
            .with_body("jar-bytes")
            .expect(1)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("plugin.jar");
        let link = format!("{}/files/plugin.jar", server.url());
        let manager = DownloadManager::new(true);

        let first = manager.ensure(Some(&link), &destination).await.unwrap();
        let second = manager.ensure(Some(&link), &destination).await.unwrap();

        mock.assert_async().await;
        assert_eq!(first, DownloadOutcome::Downloaded);
        assert_eq!(second, DownloadOutcome::Exists);
        assert_eq!(std::fs::read_to_string(&destination).unwrap(), "jar-bytes");
        assert!(!partial_path(&destination).exists());
    }

    #[tokio::test]
    async fn ensure_does_not_overwrite_existing_file() {
        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("plugin.jar");
        std::fs::write(&destination, "original").unwrap();

        let manager = DownloadManager::new(true);
        let outcome = manager
            .ensure(Some("http://127.0.0.1:1/plugin.jar"), &destination)
            .await
            .unwrap();

        assert_eq!(outcome, DownloadOutcome::Exists);
        assert_eq!(std::fs::read_to_string(&destination).unwrap(), "original");
    }

    #[tokio::test]
    async fn ensure_skips_when_disabled_or_link_missing() {
        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("plugin.jar");

        let disabled = DownloadManager::new(false);
        assert_eq!(
            disabled
                .ensure(Some("http://127.0.0.1:1/plugin.jar"), &destination)
                .await
                .unwrap(),
            DownloadOutcome::Skipped
        );

        let enabled = DownloadManager::new(true);
        assert_eq!(
            enabled.ensure(None, &destination).await.unwrap(),
            DownloadOutcome::Skipped
        );
        assert!(!destination.exists());
    }

    #[tokio::test]
    async fn ensure_follows_redirects() {
        let mut server = Server::new_async().await;
        let _redirect = server
            .mock("GET", "/download")
            .with_status(302)
            .with_header("location", &format!("{}/cdn/plugin.jar", server.url()))
            .create_async()
            .await;
        let _file = server
            .mock("GET", "/cdn/plugin.jar")
            .with_status(200)
            .with_body("redirected")
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("nested").join("plugin.jar");
        let manager = DownloadManager::new(true);

        let outcome = manager
            .ensure(Some(&format!("{}/download", server.url())), &destination)
            .await
            .unwrap();

        assert_eq!(outcome, DownloadOutcome::Downloaded);
        assert_eq!(std::fs::read_to_string(&destination).unwrap(), "redirected");
    }

    #[tokio::test]
    async fn ensure_rejects_non_ok_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing.jar")
            .with_status(404)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("missing.jar");
        let manager = DownloadManager::new(true);

        let result = manager
            .ensure(Some(&format!("{}/missing.jar", server.url())), &destination)
            .await;

        assert!(matches!(
            result,
            Err(DownloadError::HttpStatus(status)) if status == StatusCode::NOT_FOUND
        ));
        assert!(!destination.exists());
    }

    #[tokio::test]
    async fn ensure_removes_partial_file_when_body_is_cut_off() {
        use std::io::Write as _;

        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/broken.jar")
            .with_status(200)
            .with_chunked_body(|w| {
                w.write_all(b"first half")?;
                Err(std::io::Error::new(
                    std::io::ErrorKind::ConnectionAborted,
                    "connection dropped",
                ))
            })
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("broken.jar");
        let manager = DownloadManager::new(true);

        let result = manager
            .ensure(Some(&format!("{}/broken.jar", server.url())), &destination)
            .await;

        assert!(matches!(result, Err(DownloadError::Network(_))));
        assert!(!destination.exists());
        assert!(!partial_path(&destination).exists());
    }

    #[tokio::test]
    async fn discard_partial_ignores_missing_file() {
        let dir = TempDir::new().unwrap();
        let partial = dir.path().join("never-created.jar.part");

        discard_partial(&partial).await;

        assert!(!partial.exists());
    }

    #[test]
    fn destination_for_uses_last_path_segment() {
        let dir = Path::new("/srv/updates");

        assert_eq!(
            destination_for("https://example.com/releases/Plugin-2.0.jar?sig=abc", dir),
            Some(PathBuf::from("/srv/updates/Plugin-2.0.jar"))
        );
        assert_eq!(destination_for("", dir), None);
    }
}
