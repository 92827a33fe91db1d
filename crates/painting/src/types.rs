use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_STROKE_COLOR, DEFAULT_STROKE_WIDTH};

/// Composite rule applied when rendering new pixels over existing ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum CompositeMode {
    /// Source-over
    #[default]
    PaintOver = 0,
    /// Destination-out: removes existing paint under the source alpha
    Erase = 1,
}

/// Drawing tool selected by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Pencil,
    Eraser,
}

impl Tool {
    pub fn composite_mode(self) -> CompositeMode {
        match self {
            Tool::Pencil => CompositeMode::PaintOver,
            Tool::Eraser => CompositeMode::Erase,
        }
    }
}

/// A point in logical (CSS pixel) surface coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// On-screen placement of the drawing area, in CSS pixels
///
/// `left`/`top` are the offset subtracted from client coordinates;
/// `width`/`height` are the logical size of the surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Bounds anchored at the client origin
    pub fn sized(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }
}

/// Stroke parameters fed into every raster call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    /// Straight-alpha RGBA
    pub color: [u8; 4],
    /// Line width in logical pixels
    pub width: f32,
    pub mode: CompositeMode,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: DEFAULT_STROKE_COLOR,
            width: DEFAULT_STROKE_WIDTH,
            mode: CompositeMode::PaintOver,
        }
    }
}

/// Axis-aligned rectangle in physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Smallest rectangle covering both
    pub fn union(&self, other: &PixelRect) -> PixelRect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = (self.x + self.width).max(other.x + other.width);
        let y1 = (self.y + self.height).max(other.y + other.height);
        PixelRect::new(x0, y0, x1 - x0, y1 - y0)
    }
}
