//! Attachment download sink
//!
//! Decorates another sink: downloads an item's `file_urls` into the
//! configured directory, then forwards the item unchanged. A failed
//! download loses that one file, never the item.

use crate::item::DocumentItem;
use crate::pipeline::{ItemSink, SinkError};
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;

/// Sink decorator that fetches item attachments
pub struct FileDownloadSink<S> {
    inner: S,
    client: Client,
    files_dir: PathBuf,
}

impl<S: ItemSink> FileDownloadSink<S> {
    pub fn new(inner: S, files_dir: impl Into<PathBuf>) -> Result<Self, SinkError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| SinkError::Download(e.to_string()))?;

        Ok(Self {
            inner,
            client,
            files_dir: files_dir.into(),
        })
    }

    async fn download(&self, url: &str) -> Result<PathBuf, SinkError> {
        std::fs::create_dir_all(&self.files_dir)?;
        let path = self.files_dir.join(attachment_name(url));

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SinkError::Download(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SinkError::Download(format!(
                "HTTP {} for {}",
                response.status().as_u16(),
                url
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SinkError::Download(e.to_string()))?;
        std::fs::write(&path, &bytes)?;

        Ok(path)
    }
}

impl<S: ItemSink> ItemSink for FileDownloadSink<S> {
    async fn process(&mut self, item: DocumentItem) -> Result<(), SinkError> {
        for url in &item.file_urls {
            match self.download(url).await {
                Ok(path) => {
                    tracing::info!("Downloaded attachment {} -> {}", url, path.display())
                }
                Err(e) => tracing::warn!("Attachment download failed for {}: {}", url, e),
            }
        }

        self.inner.process(item).await
    }

    async fn close(&mut self) -> Result<(), SinkError> {
        self.inner.close().await
    }
}

/// Last path segment of the URL, query stripped; `attachment` when the
/// URL ends in a slash
fn attachment_name(url: &str) -> String {
    let without_query = url.split(|c| c == '?' || c == '#').next().unwrap_or(url);
    without_query
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or("attachment")
        .to_string()
}
