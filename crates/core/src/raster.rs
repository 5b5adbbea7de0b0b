//! Software raster surface.
//!
//! Renders into an RGBA8 buffer with `ab_glyph` outlines. Text is first
//! rasterized into a coverage mask. The outline is the band between a disc
//! dilation and a disc erosion of that mask (radius = line width / 2), which
//! gives round joins, and is composited source-over before the fill.

use crate::asset::ImageAsset;
use crate::error::{MemeError, Result};
use crate::export::encode_png;
use crate::geometry::Point;
use crate::style::{Color, FontSpec, StrokeStyle, TextAlign, TextAnchor, TextBaseline};
use crate::surface::{Surface, TextMetrics};
use ab_glyph::{point, Font, FontArc, GlyphId, OutlinedGlyph, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use std::path::Path;
use tracing::{debug, warn};

/// Fonts available to a [`RasterSurface`], keyed by family name.
#[derive(Clone, Default)]
pub struct FontBook {
    fonts: Vec<(String, FontArc)>,
}

impl FontBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a font under `family`, replacing any previous one.
    pub fn add_font_bytes(&mut self, family: &str, bytes: Vec<u8>) -> Result<()> {
        let font = FontArc::try_from_vec(bytes).map_err(|e| MemeError::FontLoad {
            family: family.to_string(),
            message: e.to_string(),
        })?;
        self.fonts
            .retain(|(name, _)| !name.eq_ignore_ascii_case(family));
        self.fonts.push((family.to_string(), font));
        debug!("Registered font family '{}'", family);
        Ok(())
    }

    /// Read a TrueType/OpenType file and register it under `family`.
    pub fn add_font_file(&mut self, family: &str, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| MemeError::io(path, e))?;
        self.add_font_bytes(family, bytes)
    }

    /// Font for `family` (case-insensitive), else the first registered font.
    pub fn resolve(&self, family: &str) -> Option<&FontArc> {
        self.fonts
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(family))
            .or_else(|| self.fonts.first())
            .map(|(_, font)| font)
    }

    pub fn families(&self) -> Vec<&str> {
        self.fonts.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

/// A surface backed by an in-memory RGBA8 image.
pub struct RasterSurface {
    pixels: RgbaImage,
    fonts: FontBook,
}

impl RasterSurface {
    /// Create an empty 0x0 surface.
    pub fn new(fonts: FontBook) -> Self {
        Self {
            pixels: RgbaImage::new(0, 0),
            fonts,
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    pub fn fonts_mut(&mut self) -> &mut FontBook {
        &mut self.fonts
    }

    fn font_for(&self, spec: &FontSpec) -> Option<&FontArc> {
        let font = self.fonts.resolve(&spec.family);
        if font.is_none() {
            warn!("No font available for family '{}', skipping text", spec.family);
        }
        font
    }

    fn paint(&mut self, mask: &CoverageMask, coverage: &[f32], color: Color) {
        let (width, height) = (self.pixels.width() as i32, self.pixels.height() as i32);
        for row in 0..mask.height {
            let y = mask.y0 + row as i32;
            if y < 0 || y >= height {
                continue;
            }
            for col in 0..mask.width {
                let x = mask.x0 + col as i32;
                if x < 0 || x >= width {
                    continue;
                }
                let c = coverage[row * mask.width + col];
                if c > 0.0 {
                    blend_pixel(self.pixels.get_pixel_mut(x as u32, y as u32), color, c);
                }
            }
        }
    }
}

impl Surface for RasterSurface {
    type Image = ImageAsset;

    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.pixels = RgbaImage::new(width, height);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        for pixel in self.pixels.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
        Ok(())
    }

    fn draw_image(&mut self, image: &ImageAsset, x: f32, y: f32) -> Result<()> {
        image::imageops::overlay(
            &mut self.pixels,
            image.pixels(),
            x.round() as i64,
            y.round() as i64,
        );
        Ok(())
    }

    fn measure_text(&self, text: &str, spec: &FontSpec) -> Result<TextMetrics> {
        if text.is_empty() {
            return Ok(TextMetrics::default());
        }
        let Some(font) = self.font_for(spec) else {
            return Ok(TextMetrics::default());
        };
        Ok(measure(font, text, spec.size()))
    }

    fn stroke_text(
        &mut self,
        text: &str,
        at: Point,
        spec: &FontSpec,
        anchor: TextAnchor,
        stroke: &StrokeStyle,
    ) -> Result<()> {
        if text.is_empty() || stroke.width <= 0.0 {
            return Ok(());
        }
        let radius = stroke.width / 2.0;
        let Some(mask) = self
            .font_for(spec)
            .and_then(|font| rasterize(font, text, spec.size(), at, anchor, radius.ceil() as i32 + 1))
        else {
            return Ok(());
        };
        let band = stroke_band(&mask, radius);
        self.paint(&mask, &band, stroke.color);
        Ok(())
    }

    fn fill_text(
        &mut self,
        text: &str,
        at: Point,
        spec: &FontSpec,
        anchor: TextAnchor,
        color: Color,
    ) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        let Some(mask) = self
            .font_for(spec)
            .and_then(|font| rasterize(font, text, spec.size(), at, anchor, 1))
        else {
            return Ok(());
        };
        self.paint(&mask, &mask.data, color);
        Ok(())
    }

    fn export_png(&self, compression: u8) -> Result<Vec<u8>> {
        encode_png(
            self.pixels.width(),
            self.pixels.height(),
            self.pixels.as_raw(),
            compression,
        )
    }
}

/// Pixel scale for a CSS-style font size, where `size` is the em height.
fn em_scale(font: &FontArc, size: f32) -> PxScale {
    match font.units_per_em() {
        Some(units) if units > 0.0 => PxScale::from(size * font.height_unscaled() / units),
        _ => PxScale::from(size),
    }
}

/// Lay out a single line, left-aligned at x=0 on the baseline.
/// Returns `(glyphs, total_width)`.
fn layout_line(font: &FontArc, text: &str, scale: PxScale) -> (Vec<(GlyphId, f32)>, f32) {
    let scaled = font.as_scaled(scale);
    let mut glyphs = Vec::with_capacity(text.len());
    let mut cursor_x = 0.0f32;
    let mut last_glyph: Option<GlyphId> = None;

    for ch in text.chars() {
        let glyph_id = font.glyph_id(ch);
        if let Some(prev) = last_glyph {
            cursor_x += scaled.kern(prev, glyph_id);
        }
        glyphs.push((glyph_id, cursor_x));
        cursor_x += scaled.h_advance(glyph_id);
        last_glyph = Some(glyph_id);
    }

    (glyphs, cursor_x)
}

fn outline_line(
    font: &FontArc,
    glyphs: &[(GlyphId, f32)],
    scale: PxScale,
    origin: Point,
) -> Vec<OutlinedGlyph> {
    glyphs
        .iter()
        .filter_map(|&(id, x)| {
            font.outline_glyph(id.with_scale_and_position(scale, point(origin.x + x, origin.y)))
        })
        .collect()
}

fn measure(font: &FontArc, text: &str, size: f32) -> TextMetrics {
    let scale = em_scale(font, size);
    let (glyphs, width) = layout_line(font, text, scale);
    let outlined = outline_line(font, &glyphs, scale, Point::new(0.0, 0.0));

    let mut min_y = f32::MAX;
    let mut max_y = f32::MIN;
    for glyph in &outlined {
        let bounds = glyph.px_bounds();
        min_y = min_y.min(bounds.min.y);
        max_y = max_y.max(bounds.max.y);
    }

    if outlined.is_empty() {
        return TextMetrics {
            width,
            ascent: 0.0,
            descent: 0.0,
        };
    }
    TextMetrics {
        width,
        ascent: -min_y,
        descent: max_y,
    }
}

/// Anti-aliased glyph coverage over a pixel-aligned window of the surface.
struct CoverageMask {
    x0: i32,
    y0: i32,
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl CoverageMask {
    fn sample(&self, col: i32, row: i32) -> f32 {
        if col < 0 || row < 0 || col >= self.width as i32 || row >= self.height as i32 {
            return 0.0;
        }
        self.data[row as usize * self.width + col as usize]
    }
}

fn baseline_offset(font: &FontArc, scale: PxScale, baseline: TextBaseline) -> f32 {
    let scaled = font.as_scaled(scale);
    match baseline {
        TextBaseline::Top => scaled.ascent(),
        TextBaseline::Bottom => scaled.descent(),
        TextBaseline::Middle => (scaled.ascent() + scaled.descent()) / 2.0,
        TextBaseline::Alphabetic => 0.0,
    }
}

/// Rasterize `text` anchored at `at`, with `margin` empty pixels on every side.
fn rasterize(
    font: &FontArc,
    text: &str,
    size: f32,
    at: Point,
    anchor: TextAnchor,
    margin: i32,
) -> Option<CoverageMask> {
    let scale = em_scale(font, size);
    let (glyphs, width) = layout_line(font, text, scale);

    let origin_x = match anchor.align {
        TextAlign::Left => at.x,
        TextAlign::Center => at.x - width * 0.5,
        TextAlign::Right => at.x - width,
    };
    let origin_y = at.y + baseline_offset(font, scale, anchor.baseline);
    let outlined = outline_line(font, &glyphs, scale, Point::new(origin_x, origin_y));
    if outlined.is_empty() {
        return None;
    }

    let mut min_x = f32::MAX;
    let mut min_y = f32::MAX;
    let mut max_x = f32::MIN;
    let mut max_y = f32::MIN;
    for glyph in &outlined {
        let bounds = glyph.px_bounds();
        min_x = min_x.min(bounds.min.x);
        min_y = min_y.min(bounds.min.y);
        max_x = max_x.max(bounds.max.x);
        max_y = max_y.max(bounds.max.y);
    }

    let x0 = min_x.floor() as i32 - margin;
    let y0 = min_y.floor() as i32 - margin;
    let mask_w = (max_x.ceil() as i32 + margin - x0).max(0) as usize;
    let mask_h = (max_y.ceil() as i32 + margin - y0).max(0) as usize;
    let mut data = vec![0.0f32; mask_w * mask_h];

    for glyph in &outlined {
        let bounds = glyph.px_bounds();
        let gx0 = bounds.min.x as i32 - x0;
        let gy0 = bounds.min.y as i32 - y0;
        glyph.draw(|gx, gy, c| {
            let col = gx0 + gx as i32;
            let row = gy0 + gy as i32;
            if col >= 0 && row >= 0 && (col as usize) < mask_w && (row as usize) < mask_h {
                let idx = row as usize * mask_w + col as usize;
                data[idx] = (data[idx] + c).min(1.0);
            }
        });
    }

    Some(CoverageMask {
        x0,
        y0,
        width: mask_w,
        height: mask_h,
        data,
    })
}

/// Coverage of an outline `radius` wide on each side of the glyph edges.
fn stroke_band(mask: &CoverageMask, radius: f32) -> Vec<f32> {
    let reach = radius.ceil() as i32;
    let limit = radius * radius;
    let mut offsets = Vec::new();
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            if (dx * dx + dy * dy) as f32 <= limit {
                offsets.push((dx, dy));
            }
        }
    }

    let mut band = vec![0.0f32; mask.data.len()];
    for row in 0..mask.height as i32 {
        for col in 0..mask.width as i32 {
            let mut dilated = 0.0f32;
            let mut eroded = 1.0f32;
            for &(dx, dy) in &offsets {
                let c = mask.sample(col + dx, row + dy);
                dilated = dilated.max(c);
                eroded = eroded.min(c);
            }
            band[row as usize * mask.width + col as usize] = (dilated - eroded).clamp(0.0, 1.0);
        }
    }
    band
}

/// Source-over composite of `color` at `coverage` onto `pixel`.
fn blend_pixel(pixel: &mut Rgba<u8>, color: Color, coverage: f32) {
    let src_a = (color.a * coverage).clamp(0.0, 1.0);
    if src_a <= 0.0 {
        return;
    }
    let dst = pixel.0;
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    let mix = |src: f32, dst: u8| -> u8 {
        let dst = dst as f32 / 255.0;
        let value = (src * src_a + dst * dst_a * (1.0 - src_a)) / out_a;
        (value * 255.0).round().clamp(0.0, 255.0) as u8
    };
    pixel.0 = [
        mix(color.r, dst[0]),
        mix(color.g, dst[1]),
        mix(color.b, dst[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ];
}
