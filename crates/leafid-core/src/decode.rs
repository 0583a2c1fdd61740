//! Decoding boundary
//!
//! The only place undecodable input becomes a hard error. Everything past
//! this point works on a [`DynamicImage`] and reports problems as data.

use std::path::Path;

use image::DynamicImage;
use tracing::debug;

use crate::error::{LeafError, Result};

/// Extensions accepted for leaf photos.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "tif", "tiff", "bmp"];

/// Whether `path` has a supported image extension (case-insensitive).
pub fn is_supported_image<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Decode an image file.
pub fn decode_path<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LeafError::Io(format!("file not found: {}", path.display())));
    }

    let image = image::open(path)
        .map_err(|e| LeafError::Decode(format!("{}: {}", path.display(), e)))?;
    debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        color = ?image.color(),
        "Decoded image"
    );
    Ok(image)
}

/// Decode an in-memory image; the format is sniffed from the bytes.
pub fn decode_bytes(bytes: &[u8]) -> Result<DynamicImage> {
    if bytes.is_empty() {
        return Err(LeafError::Decode("empty input".to_string()));
    }
    image::load_from_memory(bytes).map_err(|e| LeafError::Decode(e.to_string()))
}
