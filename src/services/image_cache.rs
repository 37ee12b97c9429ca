use crate::{
    error::{ItineraryError, Result},
    types::PlaceCatalogEntry,
};
use reqwest::Url;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{debug, warn};

/// Downloads catalog images into a local directory and points
/// `local_image` at the cached copies.
#[derive(Debug, Clone)]
pub struct ImageCache {
    dir: PathBuf,
    timeout: Duration,
}

impl ImageCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            timeout: Duration::from_secs(6),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve `local_image` for every entry. Entries without a usable
    /// `image_url`, or whose download fails, end up with `local_image = None`.
    pub async fn ensure_local_images(&self, entries: &mut [PlaceCatalogEntry]) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|err| ItineraryError::Http(format!("Failed to build HTTP client: {err}")))?;

        for entry in entries.iter_mut() {
            entry.local_image = self.cache_entry(&client, entry).await;
        }
        Ok(())
    }

    async fn cache_entry(
        &self,
        client: &reqwest::Client,
        entry: &PlaceCatalogEntry,
    ) -> Option<String> {
        let raw_url = entry
            .image_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())?;
        let url = match Url::parse(raw_url) {
            Ok(url) => url,
            Err(err) => {
                warn!(
                    target: "itinerary::images",
                    place = %entry.place,
                    url = raw_url,
                    error = %err,
                    "invalid image url"
                );
                return None;
            }
        };

        let local_path = self.dir.join(file_name_for(&url, &entry.place));
        if tokio::fs::try_exists(&local_path).await.unwrap_or(false) {
            debug!(target: "itinerary::images", path = %local_path.display(), "image already cached");
            return Some(file_uri(&local_path));
        }

        match download(client, url.clone(), &local_path).await {
            Ok(()) => Some(file_uri(&local_path)),
            Err(err) => {
                warn!(
                    target: "itinerary::images",
                    place = %entry.place,
                    url = %url,
                    error = %err,
                    "image download failed"
                );
                None
            }
        }
    }
}

async fn download(client: &reqwest::Client, url: Url, local_path: &Path) -> Result<()> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|err| ItineraryError::Http(err.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ItineraryError::Http(format!("unexpected status {status}")));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|err| ItineraryError::Http(err.to_string()))?;
    tokio::fs::write(local_path, &bytes).await?;
    Ok(())
}

/// Last path segment of `url`, or `"{place}.jpg"` with spaces replaced.
fn file_name_for(url: &Url, place: &str) -> String {
    let from_url = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty());

    match from_url {
        Some(segment) => segment.to_string(),
        None => {
            let place = if place.trim().is_empty() { "img" } else { place.trim() };
            format!("{place}.jpg").replace(' ', "_")
        }
    }
}

/// `file:///` URI with forward slashes, as HTML-to-PDF renderers expect.
fn file_uri(path: &Path) -> String {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let normalized = absolute.to_string_lossy().replace('\\', "/");
    format!("file:///{}", normalized.trim_start_matches('/'))
}
