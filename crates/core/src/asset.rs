//! Decoded image assets for native surfaces.

use crate::error::{MemeError, Result};
use crate::surface::ImageSource;
use image::RgbaImage;
use std::path::Path;
use tracing::debug;

/// An in-memory RGBA8 bitmap.
#[derive(Clone, Debug)]
pub struct ImageAsset {
    pixels: RgbaImage,
}

impl ImageAsset {
    /// Wrap an already decoded bitmap.
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    /// A fully transparent bitmap of the given size.
    pub fn blank(width: u32, height: u32) -> Self {
        Self::from_rgba(RgbaImage::new(width, height))
    }

    /// Decode any format the `image` crate recognises.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory(bytes)?;
        let pixels = decoded.into_rgba8();
        debug!(
            "Decoded image {}x{} from {} bytes",
            pixels.width(),
            pixels.height(),
            bytes.len()
        );
        Ok(Self { pixels })
    }

    /// Read and decode an image file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| MemeError::io(path, e))?;
        Self::from_bytes(&bytes)
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

impl ImageSource for ImageAsset {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::encode_png;
    use image::Rgba;

    #[test]
    fn test_decode_png_bytes() {
        let mut source = RgbaImage::new(3, 2);
        source.put_pixel(1, 1, Rgba([10, 20, 30, 255]));
        let png = encode_png(3, 2, source.as_raw(), 6).unwrap();

        let asset = ImageAsset::from_bytes(&png).unwrap();
        assert_eq!((asset.width(), asset.height()), (3, 2));
        assert_eq!(asset.pixels().get_pixel(1, 1), &Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result = ImageAsset::from_bytes(b"definitely not an image");
        assert!(matches!(result, Err(MemeError::ImageDecode(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = ImageAsset::from_path("/no/such/picture.png");
        assert!(matches!(result, Err(MemeError::Io { .. })));
    }
}
