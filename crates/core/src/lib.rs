//! # meme-canvas-core
//!
//! Platform-independent core of a meme editor: one image with a top and a
//! bottom caption, each drawn as outlined text and repositionable by drag.
//!
//! Drawing goes through the [`Surface`] trait. Two surfaces ship here:
//!
//! - [`RecordingSurface`] records draw calls and measures text with fixed
//!   synthetic metrics
//! - [`RasterSurface`] renders into an RGBA buffer using `ab_glyph`
//!
//! The browser canvas surface lives in the `meme-canvas-wasm` crate.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use meme_canvas_core::{
//!     FontBook, ImageAsset, LayerId, MemeSession, RasterSurface,
//! };
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut fonts = FontBook::new();
//!     fonts.add_font_file("impact", "/usr/share/fonts/truetype/impact.ttf")?;
//!     let mut surface = RasterSurface::new(fonts);
//!
//!     let mut session = MemeSession::new();
//!     session.load_image(&mut surface, ImageAsset::from_path("cat.jpg")?)?;
//!     session.set_text(&mut surface, LayerId::Top, "ONE DOES NOT SIMPLY")?;
//!     session.set_text(&mut surface, LayerId::Bottom, "WRITE A MEME EDITOR")?;
//!
//!     session.save_png(&surface, "meme.png")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Dragging
//!
//! Pointer events carry viewport coordinates and the surface's on-screen
//! box. The session maps them to native pixels before hit testing.
//!
//! ```rust,no_run
//! use meme_canvas_core::{DisplayRect, ImageAsset, MemeSession, Point, PointerEvent, RecordingSurface};
//!
//! # fn main() -> meme_canvas_core::Result<()> {
//! let mut surface = RecordingSurface::new();
//! let mut session = MemeSession::new();
//! session.load_image(&mut surface, ImageAsset::blank(400, 500))?;
//!
//! let display = DisplayRect::new(0.0, 0.0, 400.0, 500.0);
//! session.pointer_down(&mut surface, PointerEvent::new(Point::new(200.0, 30.0), display))?;
//! session.pointer_move(&mut surface, PointerEvent::new(Point::new(220.0, 60.0), display))?;
//! session.pointer_up();
//! # Ok(())
//! # }
//! ```

pub mod asset;
pub mod config;
pub mod drag;
pub mod error;
pub mod export;
pub mod geometry;
pub mod layer;
pub mod raster;
pub mod render;
pub mod session;
pub mod style;
pub mod surface;

// Re-export main types for convenience
pub use asset::ImageAsset;
pub use config::{EditorConfig, ExportConfig, StyleConfig};
pub use drag::{Cursor, DragController, DragSession, DragState};
pub use error::{MemeError, Result};
pub use export::{encode_png, export_png, save_png};
pub use geometry::{to_surface_coords, DisplayRect, Point, Rect};
pub use hit_test::{hit_test_text, is_point_over_text, text_bounds};
pub use layer::{LayerId, TextLayer};
pub use raster::{FontBook, RasterSurface};
pub use render::{render, Scene};
pub use session::{LoadTicket, MemeSession, PointerEvent, PointerOutcome};
pub use style::{
    outline_width, Color, FontSpec, LineJoin, StrokeStyle, TextAlign, TextAnchor, TextBaseline,
};
pub use surface::{DrawCommand, ImageSource, RecordingSurface, Surface, TextMetrics};

/// Image formats accepted by [`ImageAsset::from_bytes`].
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// Check if a file extension is a supported image format.
pub fn is_supported_extension(ext: &str) -> bool {
    SUPPORTED_EXTENSIONS
        .iter()
        .any(|&e| e.eq_ignore_ascii_case(ext))
}

/// Initialize the library's logging.
/// Call this once at application startup if you want to see logs.
pub fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_extension("PNG"));
        assert!(is_supported_extension("jpeg"));
        assert!(!is_supported_extension("txt"));
    }
}
