//! Shared configuration for the doodle pad
//!
//! This crate provides the single source of truth for tool defaults, the
//! built-in palette, persistence and export settings, and the display
//! geometry shared between the engine and its front ends.

use serde::{Deserialize, Serialize};

/// Storage key holding the saved drawing (one data URI)
pub const STORAGE_KEY: &str = "doodlePadDrawing";

/// File name used for downloads
pub const DOWNLOAD_FILE_NAME: &str = "doodle.png";

/// Built-in palette, in display order
pub const DEFAULT_PALETTE: [&str; 12] = [
    "#FF0000", // Red
    "#FFA500", // Orange
    "#FFFF00", // Yellow
    "#00C000", // Green
    "#0000FF", // Blue
    "#800080", // Purple
    "#A52A2A", // Brown
    "#000000", // Black
    "#FFFFFF", // White
    "#CCCCCC", // Light gray
    "#888888", // Gray
    "#444444", // Dark gray
];

/// Stroke color on startup
pub const DEFAULT_COLOR: &str = "#000000";

/// Stroke width on startup, in logical pixels
pub const DEFAULT_STROKE_WIDTH: f32 = 5.0;

/// Smallest width the width control allows
pub const MIN_STROKE_WIDTH: f32 = 1.0;

/// Largest width the width control allows
pub const MAX_STROKE_WIDTH: f32 = 50.0;

/// Increment used by the width step buttons
pub const STROKE_WIDTH_STEP: f32 = 1.0;

/// Export format sent to the color suggestion service
pub const SUGGESTION_MIME: &str = "image/jpeg";

/// Export quality sent to the color suggestion service
pub const SUGGESTION_QUALITY: f32 = 0.7;

/// Default scale factor (1.0 = no scaling)
pub const DEFAULT_SCALE: f32 = 1.0;

/// Clamp a requested stroke width into the allowed range
///
/// Non-finite input falls back to the default width.
pub fn clamp_stroke_width(width: f32) -> f32 {
    if !width.is_finite() {
        return DEFAULT_STROKE_WIDTH;
    }
    width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH)
}

/// Display geometry of the drawing area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Width in logical pixels
    pub width: f32,
    /// Height in logical pixels
    pub height: f32,
    /// Device pixel ratio
    pub scale: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            scale: DEFAULT_SCALE,
        }
    }
}

impl DisplayConfig {
    pub fn new(width: f32, height: f32, scale: f32) -> Self {
        Self {
            width,
            height,
            scale,
        }
    }

    /// Get scaled width (for physical pixel calculations)
    pub fn scaled_width(&self) -> u32 {
        (self.width * self.scale).floor().max(0.0) as u32
    }

    /// Get scaled height (for physical pixel calculations)
    pub fn scaled_height(&self) -> u32 {
        (self.height * self.scale).floor().max(0.0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DisplayConfig::default();
        assert_eq!(config.scale, DEFAULT_SCALE);
        assert_eq!(config.scaled_width(), 0);
    }

    #[test]
    fn test_scaled_dimensions() {
        let config = DisplayConfig::new(800.0, 600.5, 2.0);
        assert_eq!(config.scaled_width(), 1600);
        assert_eq!(config.scaled_height(), 1201);

        let fractional = DisplayConfig::new(101.0, 33.0, 1.5);
        assert_eq!(fractional.scaled_width(), 151);
        assert_eq!(fractional.scaled_height(), 49);
    }

    #[test]
    fn test_clamp_stroke_width() {
        assert_eq!(clamp_stroke_width(0.0), MIN_STROKE_WIDTH);
        assert_eq!(clamp_stroke_width(12.0), 12.0);
        assert_eq!(clamp_stroke_width(400.0), MAX_STROKE_WIDTH);
        assert_eq!(clamp_stroke_width(f32::NAN), DEFAULT_STROKE_WIDTH);
    }

    #[test]
    fn test_palette_is_hex() {
        for color in DEFAULT_PALETTE {
            assert_eq!(color.len(), 7);
            assert!(color.starts_with('#'));
            assert!(color[1..].chars().all(|c| c.is_ascii_hexdigit()));
        }
        assert!(DEFAULT_PALETTE.contains(&DEFAULT_COLOR));
    }
}
