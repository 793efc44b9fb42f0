//! Illustration image fetching.
//!
//! Image URLs come from the workbook's lookup sheet. Fetching, decoding and
//! re-encoding can fail in many ways; every failure is reported as an
//! [`Error`] and the report builder turns it into a placeholder.

#[cfg(feature = "fetch")]
mod http;
mod picture;

#[cfg(feature = "fetch")]
pub use http::HttpImageFetcher;
pub use picture::{fit_within, prepare_image, PreparedImage};

use crate::config::ImageConfig;
use crate::error::{Error, Result};
use std::path::Path;

/// Source of raw image bytes.
pub trait ImageFetcher {
    /// Fetch the bytes behind a URL.
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// A fetcher that refuses every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledFetcher;

impl ImageFetcher for DisabledFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        Err(Error::Fetch(format!("image fetching is disabled ({})", url)))
    }
}

/// Create the fetcher matching the configuration and enabled features.
pub fn default_fetcher(config: &ImageConfig) -> Result<Box<dyn ImageFetcher>> {
    if !config.enabled {
        return Ok(Box::new(DisabledFetcher));
    }
    #[cfg(feature = "fetch")]
    {
        Ok(Box::new(HttpImageFetcher::new(config)?))
    }
    #[cfg(not(feature = "fetch"))]
    {
        log::warn!("Built without the `fetch` feature; images will not be embedded");
        Ok(Box::new(DisabledFetcher))
    }
}

/// Fetches, prepares and optionally saves record images.
pub struct ImageLoader<'a> {
    fetcher: &'a dyn ImageFetcher,
    config: &'a ImageConfig,
}

impl<'a> ImageLoader<'a> {
    /// Create a loader.
    pub fn new(fetcher: &'a dyn ImageFetcher, config: &'a ImageConfig) -> Self {
        Self { fetcher, config }
    }

    /// Fetch and prepare the image at `url`; `key` names the saved copy.
    pub fn load(&self, url: &str, key: &str) -> Result<PreparedImage> {
        let data = self.fetcher.fetch(url)?;
        let prepared = prepare_image(&data, self.config.max_width, self.config.max_height)?;

        if let Some(dir) = &self.config.save_dir {
            if let Err(e) = save_copy(dir, key, &prepared.png) {
                log::warn!("Could not save image for {}: {}", key, e);
            }
        }
        Ok(prepared)
    }
}

/// File name of a saved image copy.
pub fn saved_image_name(key: &str) -> String {
    let safe: String = key
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    format!("patent_{}.png", safe)
}

fn save_copy(dir: &Path, key: &str, png: &[u8]) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(saved_image_name(key));
    std::fs::write(&path, png)?;
    log::debug!("Saved image {}", path.display());
    Ok(())
}
