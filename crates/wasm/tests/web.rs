//! Browser tests for the Canvas 2D surface.
//!
//! Run with: wasm-pack test --headless --chrome crates/wasm

#![cfg(target_arch = "wasm32")]

use meme_canvas_core::{
    Color, FontSpec, ImageAsset, LineJoin, Point, StrokeStyle, Surface, TextAnchor, TextBaseline,
};
use meme_canvas_wasm::{Canvas2DSurface, MemeEditor};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlCanvasElement;

wasm_bindgen_test_configure!(run_in_browser);

fn make_canvas(id: &str) -> HtmlCanvasElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .unwrap()
        .dyn_into()
        .unwrap();
    canvas.set_id(id);
    document.body().unwrap().append_child(&canvas).unwrap();
    canvas
}

#[wasm_bindgen_test]
fn test_missing_canvas_is_an_error() {
    assert!(Canvas2DSurface::new("no-such-canvas").is_err());
}

#[wasm_bindgen_test]
fn test_resize_and_measure() {
    let canvas = make_canvas("measure-canvas");
    let mut surface = Canvas2DSurface::from_canvas(canvas).unwrap();
    surface.resize(120, 80).unwrap();
    assert_eq!((surface.width(), surface.height()), (120, 80));

    let font = FontSpec::new("sans-serif", 40);
    let metrics = surface.measure_text("MEME", &font).unwrap();
    assert!(metrics.width > 0.0);
    assert!(metrics.ascent > 0.0);
    assert_eq!(
        surface.measure_text("", &font).unwrap().width,
        0.0
    );
}

#[wasm_bindgen_test]
fn test_text_draws_pixels_and_exports() {
    let canvas = make_canvas("draw-canvas");
    let mut surface = Canvas2DSurface::from_canvas(canvas).unwrap();
    surface.resize(100, 60).unwrap();

    let font = FontSpec::new("sans-serif", 40);
    let anchor = TextAnchor::centered(TextBaseline::Top);
    let stroke = StrokeStyle {
        color: Color::BLACK,
        width: 5.0,
        join: LineJoin::Round,
    };
    surface
        .stroke_text("A", Point::new(50.0, 5.0), &font, anchor, &stroke)
        .unwrap();
    surface
        .fill_text("A", Point::new(50.0, 5.0), &font, anchor, Color::WHITE)
        .unwrap();

    let png = surface.export_png(6).unwrap();
    let decoded = ImageAsset::from_bytes(&png).unwrap();
    assert_eq!(decoded.pixels().dimensions(), (100, 60));
    assert!(decoded.pixels().pixels().any(|p| p.0[3] > 0));
}

#[wasm_bindgen_test]
fn test_editor_export_requires_image() {
    make_canvas("editor-canvas");
    let editor = MemeEditor::new("editor-canvas").unwrap();
    assert!(!editor.has_image());
    assert!(editor.export_png().is_err());
    editor.set_top_text("TOP").unwrap();
    editor.reset().unwrap();
}
