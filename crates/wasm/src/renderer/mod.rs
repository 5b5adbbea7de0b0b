//! Browser drawing surfaces.
//!
//! Canvas 2D is the only backend: captions need `strokeText`/`fillText`
//! with the browser's own font stack.

mod canvas2d;

pub use canvas2d::{Canvas2DSurface, HtmlImage};
