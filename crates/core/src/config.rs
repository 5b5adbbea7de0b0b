//! Configuration types for meme composition.

use crate::error::{MemeError, Result};
use crate::style::{outline_width, Color, FontSpec, LineJoin, StrokeStyle};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Text styling shared by both captions.
///
/// Assembled once from the form inputs and treated as immutable for the
/// duration of a render or hit-test pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Font family name.
    /// Default: "impact".
    pub font_family: String,

    /// Font size in pixels.
    /// Default: 40.
    pub font_size: u32,

    /// Fill color of the caption glyphs.
    /// Default: white.
    pub text_color: Color,

    /// Outline color drawn underneath the fill.
    /// Default: black.
    pub outline_color: Color,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_family: "impact".to_string(),
            font_size: 40,
            text_color: Color::WHITE,
            outline_color: Color::BLACK,
        }
    }
}

impl StyleConfig {
    /// Set the font family.
    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    /// Set the font size in pixels.
    pub fn font_size(mut self, size: u32) -> Self {
        self.font_size = size;
        self
    }

    /// Set the fill color.
    pub fn text_color(mut self, color: Color) -> Self {
        self.text_color = color;
        self
    }

    /// Set the outline color.
    pub fn outline_color(mut self, color: Color) -> Self {
        self.outline_color = color;
        self
    }

    pub fn font(&self) -> FontSpec {
        FontSpec::new(self.font_family.clone(), self.font_size)
    }

    pub fn stroke(&self) -> StrokeStyle {
        StrokeStyle {
            color: self.outline_color,
            width: outline_width(self.font_size),
            join: LineJoin::Round,
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.font_family.trim().is_empty() {
            return Err(MemeError::InvalidConfig(
                "font_family must not be empty".to_string(),
            ));
        }
        if self.font_size == 0 {
            return Err(MemeError::InvalidConfig(
                "font_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration for the interactive editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Extra margin around a caption's bounding box that still counts as a hit.
    /// Default: 10 surface pixels.
    pub hit_padding: f32,

    /// Captions start `height / edge_margin_divisor` pixels from the top and
    /// bottom edges.
    /// Default: 25.
    pub edge_margin_divisor: f32,

    /// Style restored on reset.
    pub default_style: StyleConfig,

    /// Export settings.
    pub export: ExportConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            hit_padding: 10.0,
            edge_margin_divisor: 25.0,
            default_style: StyleConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl EditorConfig {
    /// Set the hit padding.
    pub fn hit_padding(mut self, padding: f32) -> Self {
        self.hit_padding = padding;
        self
    }

    /// Set the style restored on reset.
    pub fn default_style(mut self, style: StyleConfig) -> Self {
        self.default_style = style;
        self
    }

    /// Parse a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| MemeError::io(path, e))?;
        Self::from_json(&json)
    }

    /// Validate the entire configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.hit_padding.is_finite() || self.hit_padding < 0.0 {
            return Err(MemeError::InvalidConfig(
                "hit_padding must be a non-negative number".to_string(),
            ));
        }
        if !self.edge_margin_divisor.is_finite() || self.edge_margin_divisor <= 0.0 {
            return Err(MemeError::InvalidConfig(
                "edge_margin_divisor must be greater than 0".to_string(),
            ));
        }
        self.default_style.validate()?;
        self.export.validate()?;
        Ok(())
    }
}

/// Configuration for PNG export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// PNG compression level (0-9, higher = smaller file, slower).
    /// Default: 6.
    pub png_compression: u8,

    /// Suggested download file name.
    /// Default: "meme.png".
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            png_compression: 6,
            file_name: "meme.png".to_string(),
        }
    }
}

impl ExportConfig {
    /// Set PNG compression level.
    pub fn png_compression(mut self, level: u8) -> Self {
        self.png_compression = level.min(9);
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.png_compression > 9 {
            return Err(MemeError::InvalidConfig(
                "png_compression must be between 0 and 9".to_string(),
            ));
        }
        if self.file_name.trim().is_empty() {
            return Err(MemeError::InvalidConfig(
                "file_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
