//! Full-surface redraw of image plus captions.

use crate::config::StyleConfig;
use crate::error::Result;
use crate::geometry::Point;
use crate::layer::{LayerId, TextLayer};
use crate::surface::{ImageSource, Surface};
use tracing::trace;

/// Everything a render pass reads, borrowed from the session.
pub struct Scene<'a, I> {
    pub image: Option<&'a I>,
    pub top: &'a TextLayer,
    pub bottom: &'a TextLayer,
    pub style: &'a StyleConfig,
    pub margin_divisor: f32,
}

impl<'a, I: ImageSource> Scene<'a, I> {
    pub fn layer(&self, id: LayerId) -> &'a TextLayer {
        match id {
            LayerId::Top => self.top,
            LayerId::Bottom => self.bottom,
        }
    }

    /// Stored position, or the default for the current image. `None` without an image.
    pub fn resolved_position(&self, id: LayerId) -> Option<Point> {
        let image = self.image?;
        let default = id.default_position(image.width(), image.height(), self.margin_divisor);
        Some(self.layer(id).position_or(default))
    }
}

/// Redraw the whole surface from `scene`.
///
/// Without an image the surface is only cleared. Otherwise the surface is
/// resized to the image, the image is drawn at the origin, and each caption
/// is stroked and then filled, top first.
pub fn render<S: Surface>(surface: &mut S, scene: &Scene<'_, S::Image>) -> Result<()> {
    let Some(image) = scene.image else {
        surface.clear()?;
        return Ok(());
    };

    surface.resize(image.width(), image.height())?;
    surface.draw_image(image, 0.0, 0.0)?;

    let font = scene.style.font();
    let stroke = scene.style.stroke();

    for id in LayerId::ALL {
        let layer = scene.layer(id);
        let at = layer.position_or(id.default_position(
            image.width(),
            image.height(),
            scene.margin_divisor,
        ));
        let anchor = id.anchor();
        surface.stroke_text(&layer.content, at, &font, anchor, &stroke)?;
        surface.fill_text(&layer.content, at, &font, anchor, scene.style.text_color)?;
    }

    trace!("Rendered {}x{}", image.width(), image.height());
    Ok(())
}
