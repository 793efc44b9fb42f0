//! HTTP image fetching.

use super::ImageFetcher;
use crate::config::ImageConfig;
use crate::error::{Error, Result};
use crate::model::Resource;
use std::time::Duration;

/// Fetches images over HTTP(S) with a blocking client.
///
/// `file://` URLs and bare paths are read from disk only when
/// `allow_local_files` is set. Any body that is not a recognized picture
/// format is rejected.
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: reqwest::blocking::Client,
    allow_local_files: bool,
}

impl HttpImageFetcher {
    /// Build a fetcher using the configured timeout and user agent.
    pub fn new(config: &ImageConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::Fetch(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            allow_local_files: config.allow_local_files,
        })
    }

    fn read_local(&self, url: &str) -> Result<Vec<u8>> {
        if !self.allow_local_files {
            return Err(Error::Fetch(format!(
                "not an http(s) URL: {} (local files are disabled)",
                url
            )));
        }
        let path = url.strip_prefix("file://").unwrap_or(url);
        std::fs::read(path)
            .map_err(|e| Error::Fetch(format!("failed to read image file {}: {}", path, e)))
    }

    fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "image/*")
            .send()
            .map_err(|e| Error::Fetch(format!("failed to fetch {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch(format!("HTTP error {} fetching {}", status, url)));
        }

        let bytes = response
            .bytes()
            .map_err(|e| Error::Fetch(format!("failed to read image bytes from {}: {}", url, e)))?;
        Ok(bytes.to_vec())
    }
}

impl ImageFetcher for HttpImageFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let url = url.trim();
        let data = if url.starts_with("http://") || url.starts_with("https://") {
            self.download(url)?
        } else {
            self.read_local(url)?
        };
        ensure_image(url, data)
    }
}

/// Pass `data` through when it starts with a known image signature.
fn ensure_image(url: &str, data: Vec<u8>) -> Result<Vec<u8>> {
    match Resource::detect_mime_type(&data) {
        Some(mime) => {
            log::debug!("{} returned {} ({} bytes)", url, mime, data.len());
            Ok(data)
        }
        None => Err(Error::Fetch(format!("{} did not return an image", url))),
    }
}
