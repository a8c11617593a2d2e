// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Media file loading.
//!
//! This module decodes image files into RGBA8 pixels plus their natural
//! size, ready to be uploaded as a texture by the UI.

use crate::engine::error::DecodeError;
use anyhow::{Context, Result};
use std::path::Path;

/// A decoded image.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    /// RGBA8, row-major, unpremultiplied.
    pub pixels: Vec<u8>,
}

/// Decode the image at `path`.
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let img = image::open(path)
        .with_context(|| format!("Failed to decode {}", path.display()))?
        .to_rgba8();
    let (width, height) = img.dimensions();
    Ok(LoadedImage {
        width,
        height,
        pixels: img.into_raw(),
    })
}

/// Resolve an opaque image source to decoded pixels.
///
/// Sources are file paths. Failures are terminal for this source.
pub fn load_source(source: &str) -> std::result::Result<LoadedImage, DecodeError> {
    let path = Path::new(source);
    if !path.exists() {
        return Err(DecodeError::NotFound(source.to_string()));
    }
    load_image(path).map_err(|e| DecodeError::Decode {
        source_key: source.to_string(),
        reason: format!("{:#}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_png_reports_natural_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        image::RgbaImage::from_pixel(4, 3, image::Rgba([255, 0, 0, 255]))
            .save(&path)
            .unwrap();

        let loaded = load_image(&path).unwrap();
        assert_eq!((loaded.width, loaded.height), (4, 3));
        assert_eq!(loaded.pixels.len(), 4 * 3 * 4);
        assert_eq!(&loaded.pixels[..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_missing_source_is_not_found() {
        let err = load_source("/definitely/not/here.png").unwrap_err();
        assert_eq!(err, DecodeError::NotFound("/definitely/not/here.png".to_string()));
    }

    #[test]
    fn test_garbage_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();

        let err = load_source(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, DecodeError::Decode { .. }));
    }
}
