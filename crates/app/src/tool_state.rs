//! Tool selection owned by the host and pushed into the surface

use doodle_config::{DEFAULT_COLOR, DEFAULT_STROKE_WIDTH, STROKE_WIDTH_STEP, clamp_stroke_width};
use doodle_ipc::{ToolKind, ToolSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub struct ToolState {
    pub tool: ToolKind,
    pub color: String,
    pub width: f32,
}

impl Default for ToolState {
    fn default() -> Self {
        Self {
            tool: ToolKind::Pencil,
            color: DEFAULT_COLOR.to_string(),
            width: DEFAULT_STROKE_WIDTH,
        }
    }
}

impl ToolState {
    /// Set the width, clamped to the slider range
    pub fn set_width(&mut self, width: f32) {
        self.width = clamp_stroke_width(width);
    }

    /// Move the width one step in the direction of `delta`
    pub fn step_width(&mut self, delta: f32) {
        let step = if delta < 0.0 {
            -STROKE_WIDTH_STEP
        } else if delta > 0.0 {
            STROKE_WIDTH_STEP
        } else {
            return;
        };
        self.set_width(self.width + step);
    }

    pub fn snapshot(&self) -> ToolSnapshot {
        ToolSnapshot {
            tool: self.tool,
            color: self.color.clone(),
            width: self.width,
        }
    }
}
