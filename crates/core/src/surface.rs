//! Traits and types for drawing surfaces.
//!
//! Every measure and draw call carries its font and anchor explicitly, so
//! results never depend on what an earlier call left behind.

use crate::asset::ImageAsset;
use crate::error::Result;
use crate::export::encode_png;
use crate::geometry::Point;
use crate::style::{Color, FontSpec, StrokeStyle, TextAnchor};

/// Anything with intrinsic pixel dimensions that a surface can draw.
pub trait ImageSource {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
}

/// Text measurement results.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextMetrics {
    /// Advance width of the text in pixels
    pub width: f32,
    /// Distance from the alphabetic baseline to the top of the inked glyphs
    pub ascent: f32,
    /// Distance from the alphabetic baseline to the bottom of the inked glyphs
    pub descent: f32,
}

impl TextMetrics {
    pub fn height(&self) -> f32 {
        self.ascent + self.descent
    }
}

/// A raster drawing target.
pub trait Surface {
    type Image: ImageSource;

    /// Native width in pixels.
    fn width(&self) -> u32;

    /// Native height in pixels.
    fn height(&self) -> u32;

    /// Change the native size. Discards all content.
    fn resize(&mut self, width: u32, height: u32) -> Result<()>;

    /// Reset every pixel to transparent.
    fn clear(&mut self) -> Result<()>;

    /// Draw an image unscaled with its top-left corner at (x, y).
    fn draw_image(&mut self, image: &Self::Image, x: f32, y: f32) -> Result<()>;

    /// Measure text with the given font.
    fn measure_text(&self, text: &str, font: &FontSpec) -> Result<TextMetrics>;

    /// Draw the outline of text.
    fn stroke_text(
        &mut self,
        text: &str,
        at: Point,
        font: &FontSpec,
        anchor: TextAnchor,
        stroke: &StrokeStyle,
    ) -> Result<()>;

    /// Fill text.
    fn fill_text(
        &mut self,
        text: &str,
        at: Point,
        font: &FontSpec,
        anchor: TextAnchor,
        color: Color,
    ) -> Result<()>;

    /// Encode the current content as PNG at `compression` (0-9).
    fn export_png(&self, compression: u8) -> Result<Vec<u8>>;
}

/// A draw call captured by [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Resize {
        width: u32,
        height: u32,
    },
    Clear,
    DrawImage {
        width: u32,
        height: u32,
        x: f32,
        y: f32,
    },
    StrokeText {
        text: String,
        at: Point,
        font: FontSpec,
        anchor: TextAnchor,
        stroke: StrokeStyle,
    },
    FillText {
        text: String,
        at: Point,
        font: FontSpec,
        anchor: TextAnchor,
        color: Color,
    },
}

/// Surface that records draw calls instead of producing pixels.
///
/// Text metrics are synthetic: each character advances `0.6 * size`, with
/// ascent `0.8 * size` and descent `0.2 * size`.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands since the last [`Surface::resize`] or [`Surface::clear`],
    /// prefixed by that call.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl Surface for RecordingSurface {
    type Image = ImageAsset;

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.width = width;
        self.height = height;
        self.commands.clear();
        self.commands.push(DrawCommand::Resize { width, height });
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
        Ok(())
    }

    fn draw_image(&mut self, image: &ImageAsset, x: f32, y: f32) -> Result<()> {
        self.commands.push(DrawCommand::DrawImage {
            width: image.width(),
            height: image.height(),
            x,
            y,
        });
        Ok(())
    }

    fn measure_text(&self, text: &str, font: &FontSpec) -> Result<TextMetrics> {
        let size = font.size();
        if text.is_empty() {
            return Ok(TextMetrics::default());
        }
        Ok(TextMetrics {
            width: text.chars().count() as f32 * size * 0.6,
            ascent: size * 0.8,
            descent: size * 0.2,
        })
    }

    fn stroke_text(
        &mut self,
        text: &str,
        at: Point,
        font: &FontSpec,
        anchor: TextAnchor,
        stroke: &StrokeStyle,
    ) -> Result<()> {
        self.commands.push(DrawCommand::StrokeText {
            text: text.to_string(),
            at,
            font: font.clone(),
            anchor,
            stroke: *stroke,
        });
        Ok(())
    }

    fn fill_text(
        &mut self,
        text: &str,
        at: Point,
        font: &FontSpec,
        anchor: TextAnchor,
        color: Color,
    ) -> Result<()> {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            at,
            font: font.clone(),
            anchor,
            color,
        });
        Ok(())
    }

    fn export_png(&self, compression: u8) -> Result<Vec<u8>> {
        let blank = vec![0u8; self.width as usize * self.height as usize * 4];
        encode_png(self.width, self.height, &blank, compression)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{TextAlign, TextBaseline};

    #[test]
    fn test_synthetic_metrics() {
        let surface = RecordingSurface::new();
        let metrics = surface
            .measure_text("AB", &FontSpec::new("impact", 40))
            .unwrap();
        assert_eq!(metrics.width, 48.0);
        assert_eq!(metrics.ascent, 32.0);
        assert_eq!(metrics.descent, 8.0);
        assert_eq!(metrics.height(), 40.0);
    }

    #[test]
    fn test_empty_text_measures_zero() {
        let surface = RecordingSurface::new();
        let metrics = surface.measure_text("", &FontSpec::new("impact", 40)).unwrap();
        assert_eq!(metrics, TextMetrics::default());
    }

    #[test]
    fn test_resize_discards_previous_commands() {
        let mut surface = RecordingSurface::new();
        let anchor = TextAnchor::new(TextAlign::Left, TextBaseline::Alphabetic);
        surface
            .fill_text("x", Point::new(1.0, 1.0), &FontSpec::new("a", 10), anchor, Color::WHITE)
            .unwrap();
        surface.resize(3, 4).unwrap();
        assert_eq!(
            surface.commands(),
            &[DrawCommand::Resize {
                width: 3,
                height: 4
            }]
        );
        assert_eq!((surface.width(), surface.height()), (3, 4));
    }

    #[test]
    fn test_export_blank_png() {
        let mut surface = RecordingSurface::new();
        surface.resize(2, 2).unwrap();
        let png = surface.export_png(6).unwrap();
        assert_eq!(&png[0..4], &[0x89, 0x50, 0x4E, 0x47]);
    }
}
