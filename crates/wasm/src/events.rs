//! DOM mouse event wiring for the canvas.

use crate::state::{EditorState, PointerKind};
use meme_canvas_core::Point;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{error, warn};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, MouseEvent};

type Listener = Closure<dyn FnMut(MouseEvent)>;

/// Mouse listeners attached to a canvas. Detached on drop.
pub struct PointerBindings {
    target: HtmlCanvasElement,
    listeners: Vec<(&'static str, Listener)>,
}

impl PointerBindings {
    pub fn attach(
        canvas: &HtmlCanvasElement,
        state: &Rc<RefCell<EditorState>>,
    ) -> Result<Self, JsValue> {
        let mut bindings = Self {
            target: canvas.clone(),
            listeners: Vec::with_capacity(4),
        };

        for kind in [
            PointerKind::Down,
            PointerKind::Move,
            PointerKind::Up,
            PointerKind::Leave,
        ] {
            let name = kind.event_name();
            let state = Rc::clone(state);
            let listener = Listener::new(move |event: MouseEvent| {
                let client = Point::new(event.client_x() as f32, event.client_y() as f32);
                let Ok(mut state) = state.try_borrow_mut() else {
                    warn!("Editor busy, dropping {} event", name);
                    return;
                };
                if let Err(e) = state.pointer(kind, client) {
                    error!("Handling {} failed: {}", name, e);
                }
            });
            canvas.add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())?;
            // Pushed right away so a later failure still detaches it on drop.
            bindings.listeners.push((name, listener));
        }

        Ok(bindings)
    }
}

impl Drop for PointerBindings {
    fn drop(&mut self) {
        for (name, listener) in &self.listeners {
            let _ = self
                .target
                .remove_event_listener_with_callback(name, listener.as_ref().unchecked_ref());
        }
    }
}
