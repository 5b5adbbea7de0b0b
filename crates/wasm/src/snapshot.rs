//! Serializable view of the editor for the host page.

use meme_canvas_core::{ImageSource, LayerId, MemeSession, Point, Result, StyleConfig};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaptionSnapshot {
    pub text: String,
    /// Anchor position in image pixels. `None` before an image loads.
    pub position: Option<Point>,
}

/// Image size, captions, style and drag target at one instant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub width: u32,
    pub height: u32,
    pub top: CaptionSnapshot,
    pub bottom: CaptionSnapshot,
    pub style: StyleConfig,
    pub dragging: Option<LayerId>,
}

impl LayoutSnapshot {
    pub fn capture<I: ImageSource>(session: &MemeSession<I>) -> Self {
        let (width, height) = session
            .image()
            .map(|image| (image.width(), image.height()))
            .unwrap_or((0, 0));
        let caption = |id: LayerId| CaptionSnapshot {
            text: session.layer(id).content.clone(),
            position: session.resolved_position(id),
        };

        Self {
            width,
            height,
            top: caption(LayerId::Top),
            bottom: caption(LayerId::Bottom),
            style: session.style().clone(),
            dragging: session.drag_state().layer(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
