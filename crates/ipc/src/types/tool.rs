//! Tool and geometry types.

use serde::{Deserialize, Serialize};

/// Drawing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Pencil,
    Eraser,
}

/// Current tool state, echoed to the UI after every change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSnapshot {
    pub tool: ToolKind,
    /// Hex color, `#rrggbb`
    pub color: String,
    /// Stroke width in logical pixels
    pub width: f32,
}

/// On-screen rectangle of the drawing area in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasBounds {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// Surface geometry after a resize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceInfo {
    pub width: f32,
    pub height: f32,
    pub scale: f32,
    pub physical_width: u32,
    pub physical_height: u32,
}

/// A changed region of the surface, in physical pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionUpdate {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// PNG data URI of the region
    pub data: String,
}
