//! Canvas 2D drawing surface.
//!
//! Wraps an `HtmlCanvasElement` and its 2D context. The canvas buffer is
//! sized to the image in native pixels; CSS may display it at any size,
//! which is why pointer positions go through [`Canvas2DSurface::display_rect`].

use meme_canvas_core::{
    encode_png, Color, Cursor, DisplayRect, FontSpec, ImageSource, MemeError, Point, Result,
    StrokeStyle, Surface, TextAnchor, TextBaseline, TextMetrics,
};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

fn js_error(context: &'static str) -> impl Fn(JsValue) -> MemeError {
    move |e| MemeError::Surface(format!("{}: {:?}", context, e))
}

/// A decoded browser image.
#[derive(Clone, Debug)]
pub struct HtmlImage {
    element: HtmlImageElement,
}

impl HtmlImage {
    pub fn new(element: HtmlImageElement) -> Self {
        Self { element }
    }

    pub fn element(&self) -> &HtmlImageElement {
        &self.element
    }
}

impl ImageSource for HtmlImage {
    fn width(&self) -> u32 {
        self.element.natural_width()
    }

    fn height(&self) -> u32 {
        self.element.natural_height()
    }
}

/// Canvas 2D surface.
pub struct Canvas2DSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Canvas2DSurface {
    /// Create a surface for the canvas with the given element ID.
    pub fn new(canvas_id: &str) -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| MemeError::Surface("No window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| MemeError::Surface("No document".into()))?;

        let element = document.get_element_by_id(canvas_id).ok_or_else(|| {
            MemeError::Surface(format!("Canvas element '{}' not found", canvas_id))
        })?;

        let canvas: HtmlCanvasElement = element
            .dyn_into()
            .map_err(|_| MemeError::Surface("Element is not a canvas".into()))?;

        Self::from_canvas(canvas)
    }

    /// Create from an existing canvas element.
    pub fn from_canvas(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(js_error("Failed to get 2d context"))?
            .ok_or_else(|| MemeError::Surface("No 2d context".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| MemeError::Surface("Failed to cast to CanvasRenderingContext2d".into()))?;

        Ok(Self { canvas, ctx })
    }

    /// Get the underlying canvas element.
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Get the 2D rendering context.
    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }

    /// The canvas's on-screen box in CSS pixels.
    pub fn display_rect(&self) -> DisplayRect {
        let rect = self.canvas.get_bounding_client_rect();
        DisplayRect::new(
            rect.left() as f32,
            rect.top() as f32,
            rect.width() as f32,
            rect.height() as f32,
        )
    }

    /// Apply a pointer affordance to the canvas's CSS cursor.
    pub fn set_cursor(&self, cursor: Cursor) -> Result<()> {
        self.canvas
            .style()
            .set_property("cursor", cursor.as_css())
            .map_err(js_error("Failed to set cursor"))
    }

    /// Current content as a `data:image/png;base64,...` URL.
    pub fn to_data_url(&self) -> Result<String> {
        self.canvas
            .to_data_url_with_type("image/png")
            .map_err(js_error("Failed to get data URL"))
    }

    fn set_text_state(&self, font: &FontSpec, anchor: TextAnchor) {
        self.ctx.set_font(&font.to_css());
        self.ctx.set_text_align(anchor.align.as_css());
        self.ctx.set_text_baseline(anchor.baseline.as_css());
    }
}

impl Surface for Canvas2DSurface {
    type Image = HtmlImage;

    fn width(&self) -> u32 {
        self.canvas.width()
    }

    fn height(&self) -> u32 {
        self.canvas.height()
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        // Assigning either dimension resets the bitmap and context state.
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.ctx.clear_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
        Ok(())
    }

    fn draw_image(&mut self, image: &HtmlImage, x: f32, y: f32) -> Result<()> {
        self.ctx
            .draw_image_with_html_image_element(&image.element, x as f64, y as f64)
            .map_err(js_error("Failed to draw image"))
    }

    fn measure_text(&self, text: &str, font: &FontSpec) -> Result<TextMetrics> {
        if text.is_empty() {
            return Ok(TextMetrics::default());
        }
        // Ascent and descent are reported relative to the alphabetic baseline.
        self.ctx.set_font(&font.to_css());
        self.ctx
            .set_text_baseline(TextBaseline::Alphabetic.as_css());
        let metrics = self
            .ctx
            .measure_text(text)
            .map_err(js_error("Failed to measure text"))?;

        Ok(TextMetrics {
            width: metrics.width() as f32,
            ascent: metrics.actual_bounding_box_ascent() as f32,
            descent: metrics.actual_bounding_box_descent() as f32,
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
        self.set_text_state(font, anchor);
        self.ctx.set_stroke_style_str(&stroke.color.to_css());
        self.ctx.set_line_width(stroke.width as f64);
        self.ctx.set_line_join(stroke.join.as_css());
        self.ctx
            .stroke_text(text, at.x as f64, at.y as f64)
            .map_err(js_error("Failed to stroke text"))
    }

    fn fill_text(
        &mut self,
        text: &str,
        at: Point,
        font: &FontSpec,
        anchor: TextAnchor,
        color: Color,
    ) -> Result<()> {
        self.set_text_state(font, anchor);
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx
            .fill_text(text, at.x as f64, at.y as f64)
            .map_err(js_error("Failed to fill text"))
    }

    fn export_png(&self, compression: u8) -> Result<Vec<u8>> {
        let (width, height) = (self.canvas.width(), self.canvas.height());
        if width == 0 || height == 0 {
            return Err(MemeError::NoImage);
        }
        let image_data = self
            .ctx
            .get_image_data(0.0, 0.0, width as f64, height as f64)
            .map_err(js_error("Failed to read image data"))?;

        encode_png(width, height, &image_data.data().0, compression)
    }
}
