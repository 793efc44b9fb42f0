//! Decoding, scaling and re-encoding fetched pictures.

use crate::error::{Error, Result};
use crate::model::Resource;
use image::{GenericImageView, ImageFormat};
use std::io::Cursor;

/// A picture ready to be embedded: PNG bytes plus its display size.
#[derive(Debug, Clone)]
pub struct PreparedImage {
    /// PNG-encoded data
    pub png: Vec<u8>,
    /// Pixel width
    pub width_px: u32,
    /// Pixel height
    pub height_px: u32,
    /// Display width in inches
    pub width: f32,
    /// Display height in inches
    pub height: f32,
}

impl PreparedImage {
    /// Convert into an embeddable resource.
    pub fn into_resource(self, source: &str) -> Resource {
        Resource::png(self.png)
            .with_dimensions(self.width_px, self.height_px)
            .with_filename(source)
    }
}

/// Display size for a picture: full `max_width` wide, shrunk to
/// `max_height` when taller, aspect ratio preserved.
pub fn fit_within(width_px: u32, height_px: u32, max_width: f32, max_height: f32) -> (f32, f32) {
    if width_px == 0 || height_px == 0 {
        return (max_width, max_height.min(max_width));
    }
    let aspect = height_px as f32 / width_px as f32;
    let mut width = max_width;
    let mut height = width * aspect;
    if height > max_height {
        height = max_height;
        width = height / aspect;
    }
    (width, height)
}

/// Decode image bytes of any supported format and re-encode them as PNG,
/// sized to fit the given box.
pub fn prepare_image(data: &[u8], max_width: f32, max_height: f32) -> Result<PreparedImage> {
    if data.is_empty() {
        return Err(Error::Image("empty image data".to_string()));
    }
    let decoded = image::load_from_memory(data)?;
    let (width_px, height_px) = decoded.dimensions();
    if width_px == 0 || height_px == 0 {
        return Err(Error::Image("image has zero size".to_string()));
    }

    let mut png = Cursor::new(Vec::new());
    decoded.write_to(&mut png, ImageFormat::Png)?;

    let (width, height) = fit_within(width_px, height_px, max_width, max_height);
    Ok(PreparedImage {
        png: png.into_inner(),
        width_px,
        height_px,
        width,
        height,
    })
}
