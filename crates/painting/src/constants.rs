/// Largest buffer edge in physical pixels. Browsers cap canvases around here too.
pub const MAX_SURFACE_DIMENSION: u32 = 16384;

/// Opaque white, used for first mount, `clear` and JPEG flattening.
pub const BACKGROUND_COLOR: [u8; 4] = [255, 255, 255, 255];

/// MIME type used when `export` is called without a format.
pub const DEFAULT_EXPORT_MIME: &str = "image/png";

/// Quality used when `export` is called without one (maximum).
pub const DEFAULT_EXPORT_QUALITY: f32 = 1.0;

/// Stroke color before the host pushes its tool state.
pub const DEFAULT_STROKE_COLOR: [u8; 4] = [0, 0, 0, 255];

/// Stroke width (logical pixels) before the host pushes its tool state.
pub const DEFAULT_STROKE_WIDTH: f32 = 5.0;
