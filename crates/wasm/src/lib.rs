//! Canvas 2D meme editor for browsers.
//!
//! Binds [`meme_canvas_core::MemeSession`] to an HTML canvas: captions are
//! drawn with the browser's `strokeText`/`fillText`, images are decoded by
//! the browser, and mouse events on the canvas drag the captions.
//!
//! # Example (JavaScript)
//!
//! ```javascript
//! import init, { MemeEditor } from 'meme-canvas-wasm';
//!
//! await init();
//! const editor = new MemeEditor('meme-canvas');
//! editor.bind_pointer_events();
//!
//! document.getElementById('image-input').onchange = async (e) => {
//!     await editor.load_image_file(e.target.files[0]);
//! };
//! document.getElementById('top-text').oninput = (e) => editor.set_top_text(e.target.value);
//! document.getElementById('bottom-text').oninput = (e) => editor.set_bottom_text(e.target.value);
//! document.getElementById('download').onclick = () => editor.download();
//! document.getElementById('reset').onclick = () => editor.reset();
//! ```

use js_sys::Promise;
use meme_canvas_core::{Color, EditorConfig, LayerId, MemeError, MemeSession, Point};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, HtmlImageElement, Url};

pub mod events;
pub mod renderer;
pub mod snapshot;
pub mod state;

pub use events::PointerBindings;
pub use renderer::{Canvas2DSurface, HtmlImage};
pub use snapshot::{CaptionSnapshot, LayoutSnapshot};
pub use state::{EditorState, PointerKind};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::INFO)
            .build(),
    );
    info!("meme-canvas-wasm initialized");
}

fn to_js(e: MemeError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn busy() -> JsValue {
    JsValue::from_str("Editor is busy")
}

/// Meme editor bound to one canvas element.
#[wasm_bindgen]
pub struct MemeEditor {
    state: Rc<RefCell<EditorState>>,
    bindings: Option<PointerBindings>,
}

impl MemeEditor {
    fn from_config(canvas_id: &str, config: EditorConfig) -> Result<MemeEditor, MemeError> {
        let surface = Canvas2DSurface::new(canvas_id)?;
        let session = MemeSession::with_config(config)?;
        debug!("Created MemeEditor for canvas: {}", canvas_id);
        Ok(Self {
            state: Rc::new(RefCell::new(EditorState::new(surface, session))),
            bindings: None,
        })
    }

    fn with_state<T>(
        &self,
        f: impl FnOnce(&mut EditorState) -> meme_canvas_core::Result<T>,
    ) -> Result<T, JsValue> {
        let mut state = self.state.try_borrow_mut().map_err(|_| busy())?;
        f(&mut *state).map_err(to_js)
    }

    fn set_caption(&self, id: LayerId, text: &str) -> Result<(), JsValue> {
        self.with_state(|s| s.session.set_text(&mut s.surface, id, text))
    }

    fn set_color(&self, hex: &str, outline: bool) -> Result<(), JsValue> {
        let color: Color = hex.parse().map_err(to_js)?;
        self.with_state(|s| {
            s.session.update_style(&mut s.surface, |style| {
                if outline {
                    style.outline_color(color)
                } else {
                    style.text_color(color)
                }
            })
        })
    }

    /// Start a load and resolve it once the browser has decoded `url`.
    fn load_from_url(&self, url: String, revoke: bool) -> Result<Promise, JsValue> {
        let ticket = self.with_state(|s| {
            let ticket = s.session.begin_load();
            s.session.render(&mut s.surface)?;
            Ok(ticket)
        })?;
        let state = Rc::clone(&self.state);

        Ok(future_to_promise(async move {
            let element = HtmlImageElement::new()?;
            element.set_src(&url);
            let decoded = JsFuture::from(element.decode()).await;
            if revoke {
                Url::revoke_object_url(&url)?;
            }

            let mut guard = state.try_borrow_mut().map_err(|_| busy())?;
            let EditorState { surface, session } = &mut *guard;
            match decoded {
                Ok(_) => {
                    let applied = session
                        .complete_load(surface, ticket, HtmlImage::new(element))
                        .map_err(to_js)?;
                    Ok(JsValue::from_bool(applied))
                }
                Err(e) => {
                    if session.load_failed(ticket, &format!("{:?}", e)) {
                        Err(e)
                    } else {
                        Ok(JsValue::FALSE)
                    }
                }
            }
        }))
    }
}

#[wasm_bindgen]
impl MemeEditor {
    /// Create an editor with default settings for the canvas with the given ID.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<MemeEditor, JsValue> {
        Self::from_config(canvas_id, EditorConfig::default()).map_err(to_js)
    }

    /// Create an editor from a JSON `EditorConfig`.
    pub fn with_config(canvas_id: &str, config_json: &str) -> Result<MemeEditor, JsValue> {
        let config = EditorConfig::from_json(config_json).map_err(to_js)?;
        Self::from_config(canvas_id, config).map_err(to_js)
    }

    /// Listen for mouse events on the canvas. Idempotent.
    pub fn bind_pointer_events(&mut self) -> Result<(), JsValue> {
        if self.bindings.is_some() {
            return Ok(());
        }
        let canvas = self
            .state
            .try_borrow()
            .map_err(|_| busy())?
            .surface
            .canvas()
            .clone();
        self.bindings = Some(PointerBindings::attach(&canvas, &self.state)?);
        Ok(())
    }

    /// Stop listening for mouse events.
    pub fn unbind_pointer_events(&mut self) {
        self.bindings = None;
    }

    /// Load an image from a URL. Resolves to `true` if this load was applied,
    /// `false` if a later load or a reset superseded it.
    pub fn load_image_url(&self, url: String) -> Result<Promise, JsValue> {
        self.load_from_url(url, false)
    }

    /// Load an image from a file chosen in an `<input type="file">`.
    pub fn load_image_file(&self, file: web_sys::File) -> Result<Promise, JsValue> {
        let url = Url::create_object_url_with_blob(&file)?;
        self.load_from_url(url, true)
    }

    pub fn set_top_text(&self, text: &str) -> Result<(), JsValue> {
        self.set_caption(LayerId::Top, text)
    }

    pub fn set_bottom_text(&self, text: &str) -> Result<(), JsValue> {
        self.set_caption(LayerId::Bottom, text)
    }

    pub fn set_font_family(&self, family: &str) -> Result<(), JsValue> {
        self.with_state(|s| {
            s.session
                .update_style(&mut s.surface, |style| style.font_family(family))
        })
    }

    pub fn set_font_size(&self, size_px: u32) -> Result<(), JsValue> {
        self.with_state(|s| {
            s.session
                .update_style(&mut s.surface, |style| style.font_size(size_px))
        })
    }

    /// Set the caption fill from a hex color such as `#ffffff`.
    pub fn set_text_color(&self, hex: &str) -> Result<(), JsValue> {
        self.set_color(hex, false)
    }

    /// Set the caption outline from a hex color such as `#000000`.
    pub fn set_outline_color(&self, hex: &str) -> Result<(), JsValue> {
        self.set_color(hex, true)
    }

    pub fn pointer_down(&self, client_x: f32, client_y: f32) -> Result<(), JsValue> {
        self.with_state(|s| s.pointer(PointerKind::Down, Point::new(client_x, client_y)))
    }

    pub fn pointer_move(&self, client_x: f32, client_y: f32) -> Result<(), JsValue> {
        self.with_state(|s| s.pointer(PointerKind::Move, Point::new(client_x, client_y)))
    }

    pub fn pointer_up(&self) -> Result<(), JsValue> {
        self.with_state(|s| s.pointer(PointerKind::Up, Point::default()))
    }

    pub fn pointer_leave(&self) -> Result<(), JsValue> {
        self.with_state(|s| s.pointer(PointerKind::Leave, Point::default()))
    }

    /// Clear image, captions and style. Pending loads are discarded.
    pub fn reset(&self) -> Result<(), JsValue> {
        self.with_state(|s| s.session.reset(&mut s.surface))
    }

    #[wasm_bindgen(getter)]
    pub fn has_image(&self) -> bool {
        self.state
            .try_borrow()
            .map(|s| s.session.has_image())
            .unwrap_or(false)
    }

    /// Export the canvas as PNG bytes.
    pub fn export_png(&self) -> Result<Vec<u8>, JsValue> {
        self.with_state(|s| s.session.export_png(&s.surface))
    }

    /// Export the canvas as a PNG data URL.
    pub fn to_data_url(&self) -> Result<String, JsValue> {
        self.with_state(|s| {
            if !s.session.has_image() {
                return Err(MemeError::NoImage);
            }
            s.surface.to_data_url()
        })
    }

    /// Save the canvas as a PNG through a temporary download link.
    pub fn download(&self, file_name: Option<String>) -> Result<(), JsValue> {
        let png = self.export_png()?;
        let file_name = match file_name {
            Some(name) => name,
            None => self
                .state
                .try_borrow()
                .map_err(|_| busy())?
                .session
                .config()
                .export
                .file_name
                .clone(),
        };

        let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(png.as_slice()));
        let options = BlobPropertyBag::new();
        options.set_type("image/png");
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
        let url = Url::create_object_url_with_blob(&blob)?;

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("No document"))?;
        let anchor: HtmlAnchorElement = document
            .create_element("a")?
            .dyn_into()
            .map_err(|_| JsValue::from_str("Failed to create anchor"))?;
        anchor.set_href(&url);
        anchor.set_download(&file_name);
        anchor.click();

        Url::revoke_object_url(&url)?;
        info!("Meme downloaded as {}", file_name);
        Ok(())
    }

    /// Current layout as a plain JS object.
    pub fn layout(&self) -> Result<JsValue, JsValue> {
        let snapshot = self.with_state(|s| Ok(LayoutSnapshot::capture(&s.session)))?;
        serde_wasm_bindgen::to_value(&snapshot)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Current layout as JSON.
    pub fn layout_json(&self) -> Result<String, JsValue> {
        self.with_state(|s| LayoutSnapshot::capture(&s.session).to_json())
    }
}
