//! Pointer events as the UI reports them.

use serde::{Deserialize, Serialize};

/// Mouse event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseEventKind {
    Down,
    Move,
    Up,
    Leave,
}

/// Touch event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchEventKind {
    Start,
    Move,
    End,
}

/// A single touch point in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub client_x: f32,
    pub client_y: f32,
}

/// Pointer event over the drawing area, in client coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Mouse {
        kind: MouseEventKind,
        client_x: f32,
        client_y: f32,
    },
    Touch {
        kind: TouchEventKind,
        /// Active touches, in the order the platform lists them
        touches: Vec<TouchPoint>,
    },
}
