//! The two caption layers and their default placement.

use crate::geometry::Point;
use crate::style::{TextAnchor, TextBaseline};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which caption a value refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerId {
    Top,
    Bottom,
}

impl LayerId {
    /// Paint order, which is also hit-test priority.
    pub const ALL: [LayerId; 2] = [LayerId::Top, LayerId::Bottom];

    /// Captions are centered; the top one hangs from its y, the bottom one sits on it.
    pub fn anchor(self) -> TextAnchor {
        match self {
            LayerId::Top => TextAnchor::centered(TextBaseline::Top),
            LayerId::Bottom => TextAnchor::centered(TextBaseline::Bottom),
        }
    }

    /// Default position for an image of the given size.
    pub fn default_position(self, width: u32, height: u32, margin_divisor: f32) -> Point {
        let width = width as f32;
        let height = height as f32;
        let margin = height / margin_divisor;
        match self {
            LayerId::Top => Point::new(width / 2.0, margin),
            LayerId::Bottom => Point::new(width / 2.0, height - margin),
        }
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerId::Top => f.write_str("top"),
            LayerId::Bottom => f.write_str("bottom"),
        }
    }
}

/// One caption: its text and, once known, where it sits on the surface.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextLayer {
    pub content: String,
    /// `None` until an image is loaded or after a reset.
    pub position: Option<Point>,
}

impl TextLayer {
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Stored position, falling back to `default`.
    pub fn position_or(&self, default: Point) -> Point {
        self.position.unwrap_or(default)
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.position = None;
    }
}
