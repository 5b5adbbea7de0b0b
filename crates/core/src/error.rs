//! Error types for meme composition and export.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the meme-canvas library.
#[derive(Error, Debug)]
pub enum MemeError {
    /// Export was requested before any image finished loading.
    #[error("No image loaded. Please select an image first")]
    NoImage,

    /// The image bytes could not be decoded.
    #[error("Failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    PngEncodingError(String),

    /// A color string was not a valid hex color.
    #[error("Invalid color '{0}'. Expected #RGB, #RRGGBB or #RRGGBBAA")]
    InvalidColor(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A font file could not be parsed.
    #[error("Failed to load font '{family}': {message}")]
    FontLoad { family: String, message: String },

    /// The drawing surface rejected an operation.
    #[error("Surface error: {0}")]
    Surface(String),

    /// Reading or writing a file failed.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON configuration could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Result type alias for convenience.
pub type Result<T> = std::result::Result<T, MemeError>;

impl MemeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MemeError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_no_image() {
        let err = MemeError::NoImage;
        let msg = format!("{}", err);
        assert!(msg.contains("No image loaded"));
    }

    #[test]
    fn test_error_display_invalid_color() {
        let err = MemeError::InvalidColor("#zzz".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("#zzz"));
        assert!(msg.contains("#RRGGBB"));
    }

    #[test]
    fn test_error_display_font_load() {
        let err = MemeError::FontLoad {
            family: "impact".to_string(),
            message: "invalid table".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("impact"));
        assert!(msg.contains("invalid table"));
    }

    #[test]
    fn test_error_display_io() {
        let err = MemeError::io(
            "/missing/meme.png",
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        );
        let msg = format!("{}", err);
        assert!(msg.contains("/missing/meme.png"));
        assert!(msg.contains("file not found"));
    }

    #[test]
    fn test_error_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: MemeError = json_err.into();
        match err {
            MemeError::ConfigParse(_) => (),
            _ => panic!("Expected ConfigParse"),
        }
    }

    #[test]
    fn test_error_debug_impl() {
        let err = MemeError::Surface("context lost".to_string());
        let debug = format!("{:?}", err);
        assert!(debug.contains("Surface"));
        assert!(debug.contains("context lost"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<u32> {
            Ok(40)
        }
        assert_eq!(returns_result().unwrap(), 40);

        fn returns_error() -> Result<u32> {
            Err(MemeError::NoImage)
        }
        assert!(returns_error().is_err());
    }
}
