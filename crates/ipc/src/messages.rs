//! Main IPC message enums for communication between the engine and UI.

use serde::{Deserialize, Serialize};

use crate::input::PointerEvent;
use crate::types::{CanvasBounds, RegionUpdate, SurfaceInfo, Toast, ToolKind, ToolSnapshot};

/// Messages from the UI to the doodle pad engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum UiToPad {
    /// Drawing area mounted; the engine creates the surface and loads the saved drawing
    Mounted { bounds: CanvasBounds, scale: f32 },

    /// Drawing area resized or moved
    Resized { bounds: CanvasBounds, scale: f32 },

    /// Pointer input over the drawing area
    Pointer(PointerEvent),

    /// Select pencil or eraser
    SetTool { tool: ToolKind },

    /// Select a stroke color (hex)
    SetColor { color: String },

    /// Set the stroke width from the slider
    SetStrokeWidth { width: f32 },

    /// Nudge the stroke width by `delta` (the +/- buttons)
    StepStrokeWidth { delta: f32 },

    /// Clear the drawing
    Clear,

    /// Save the drawing to local storage
    Save,

    /// Save the drawing as a PNG file
    Download,

    /// Copy the drawing to the clipboard
    CopyImage,

    /// Ask the suggestion service for a palette matching the drawing
    GetSuggestions,

    /// Export the drawing as a data URI
    Export {
        #[serde(default)]
        mime: Option<String>,
        #[serde(default)]
        quality: Option<f32>,
    },

    /// Replace the drawing with an encoded image
    Import { data: String },

    /// Stop the engine
    Shutdown,
}

/// Messages from the doodle pad engine to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PadToUi {
    /// Initial state sync when the engine starts
    Initialize {
        tool: ToolSnapshot,
        palette: Vec<String>,
        suggestions_enabled: bool,
    },

    /// Surface geometry changed
    SurfaceResized(SurfaceInfo),

    /// Part of the surface changed and should be repainted
    RegionUpdated(RegionUpdate),

    /// Tool, color or width changed
    ToolChanged(ToolSnapshot),

    /// A suggestion request is in flight
    SuggestionsPending,

    /// Suggested palette (empty when cleared or on failure)
    SuggestedColors { colors: Vec<String> },

    /// Show a notification
    Toast(Toast),

    /// Reply to `Export`; None when the surface is not ready
    Exported { data: Option<String> },

    /// The drawing was written to disk
    Downloaded { path: String },

    /// Error notification
    Error { code: String, message: String },
}
