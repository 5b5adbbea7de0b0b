//! PNG export.

use crate::error::{MemeError, Result};
use crate::surface::Surface;
use std::io::Cursor;
use std::path::Path;
use tracing::info;

/// Encode an RGBA8 buffer as PNG.
pub fn encode_png(width: u32, height: u32, rgba: &[u8], compression: u8) -> Result<Vec<u8>> {
    let expected = width as usize * height as usize * 4;
    if rgba.len() != expected {
        return Err(MemeError::PngEncodingError(format!(
            "buffer holds {} bytes, expected {} for {}x{}",
            rgba.len(),
            expected,
            width,
            height
        )));
    }

    let mut buffer = Cursor::new(Vec::new());

    let mut encoder = png::Encoder::new(&mut buffer, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(compression_for_level(compression));

    let mut writer = encoder.write_header().map_err(|e| {
        MemeError::PngEncodingError(format!("Failed to write PNG header: {}", e))
    })?;

    writer.write_image_data(rgba).map_err(|e| {
        MemeError::PngEncodingError(format!("Failed to write PNG data: {}", e))
    })?;

    drop(writer);

    Ok(buffer.into_inner())
}

fn compression_for_level(level: u8) -> png::Compression {
    match level {
        0..=2 => png::Compression::Fast,
        3..=7 => png::Compression::Default,
        _ => png::Compression::Best,
    }
}

/// Export a surface, refusing to produce a zero-sized file.
pub fn export_png<S: Surface>(surface: &S, compression: u8) -> Result<Vec<u8>> {
    if surface.width() == 0 || surface.height() == 0 {
        return Err(MemeError::NoImage);
    }
    let png = surface.export_png(compression)?;
    info!(
        "Meme exported: {}x{}, {} bytes",
        surface.width(),
        surface.height(),
        png.len()
    );
    Ok(png)
}

/// Export a surface and write it to `path`.
pub fn save_png<S: Surface>(surface: &S, path: impl AsRef<Path>, compression: u8) -> Result<()> {
    let path = path.as_ref();
    let png = export_png(surface, compression)?;
    std::fs::write(path, png).map_err(|e| MemeError::io(path, e))?;
    info!("Meme saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;
    use image::{Rgba, RgbaImage};

    const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_encode_png_small_image() {
        let mut image = RgbaImage::new(10, 10);
        for pixel in image.pixels_mut() {
            *pixel = Rgba([255, 0, 0, 255]);
        }

        let png_data = encode_png(10, 10, image.as_raw(), 6).unwrap();
        assert!(png_data.len() > 8);
        assert_eq!(&png_data[0..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_encode_png_rejects_short_buffer() {
        let result = encode_png(4, 4, &[0u8; 10], 6);
        assert!(matches!(result, Err(MemeError::PngEncodingError(_))));
    }

    #[test]
    fn test_export_empty_surface_is_rejected() {
        let surface = RecordingSurface::new();
        assert!(matches!(export_png(&surface, 6), Err(MemeError::NoImage)));
    }

    #[test]
    fn test_save_png_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meme.png");
        let mut surface = RecordingSurface::new();
        surface.resize(4, 3).unwrap();

        save_png(&surface, &path, 9).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[0..8], &PNG_SIGNATURE);
    }
}
