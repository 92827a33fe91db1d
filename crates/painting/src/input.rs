//! Pointer input normalization
//!
//! Mouse and touch events are folded into one [`PointerSample`] before they
//! reach the stroke state machine, so the drawing code never branches on
//! the input device.

use serde::{Deserialize, Serialize};

use crate::types::{Bounds, Point};

/// Mouse event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseKind {
    Down,
    Move,
    Up,
    Leave,
}

/// Touch event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchKind {
    Start,
    Move,
    End,
}

/// Raw pointer input in client coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "device", rename_all = "snake_case")]
pub enum PointerInput {
    Mouse {
        kind: MouseKind,
        client_x: f32,
        client_y: f32,
    },
    /// `touches` lists the active touch points, first finger first
    Touch {
        kind: TouchKind,
        touches: Vec<[f32; 2]>,
    },
}

/// Stroke state machine input phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Press,
    Drag,
    Release,
}

/// Device-independent pointer sample in surface-local logical coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub phase: PointerPhase,
    /// None when the event carried no usable coordinates
    pub point: Option<Point>,
}

impl PointerInput {
    pub fn phase(&self) -> PointerPhase {
        match self {
            PointerInput::Mouse { kind, .. } => match kind {
                MouseKind::Down => PointerPhase::Press,
                MouseKind::Move => PointerPhase::Drag,
                MouseKind::Up | MouseKind::Leave => PointerPhase::Release,
            },
            PointerInput::Touch { kind, .. } => match kind {
                TouchKind::Start => PointerPhase::Press,
                TouchKind::Move => PointerPhase::Drag,
                TouchKind::End => PointerPhase::Release,
            },
        }
    }

    /// Client coordinates of the event; only the first touch counts
    pub fn client_position(&self) -> Option<(f32, f32)> {
        let (x, y) = match self {
            PointerInput::Mouse {
                client_x, client_y, ..
            } => (*client_x, *client_y),
            PointerInput::Touch { touches, .. } => {
                let [x, y] = touches.first()?;
                (*x, *y)
            }
        };
        (x.is_finite() && y.is_finite()).then_some((x, y))
    }

    /// Normalize against the surface's on-screen bounds
    pub fn normalize(&self, bounds: &Bounds) -> PointerSample {
        PointerSample {
            phase: self.phase(),
            point: self
                .client_position()
                .map(|(x, y)| Point::new(x - bounds.left, y - bounds.top)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_normalization() {
        let bounds = Bounds::new(10.0, 20.0, 100.0, 100.0);
        let input = PointerInput::Mouse {
            kind: MouseKind::Down,
            client_x: 15.0,
            client_y: 30.0,
        };

        let sample = input.normalize(&bounds);
        assert_eq!(sample.phase, PointerPhase::Press);
        assert_eq!(sample.point, Some(Point::new(5.0, 10.0)));
    }

    #[test]
    fn test_leave_is_release() {
        let input = PointerInput::Mouse {
            kind: MouseKind::Leave,
            client_x: 0.0,
            client_y: 0.0,
        };
        assert_eq!(input.phase(), PointerPhase::Release);
    }

    #[test]
    fn test_touch_uses_first_point() {
        let bounds = Bounds::sized(100.0, 100.0);
        let input = PointerInput::Touch {
            kind: TouchKind::Move,
            touches: vec![[1.0, 2.0], [50.0, 60.0]],
        };

        let sample = input.normalize(&bounds);
        assert_eq!(sample.phase, PointerPhase::Drag);
        assert_eq!(sample.point, Some(Point::new(1.0, 2.0)));
    }

    #[test]
    fn test_touch_end_without_points() {
        let input = PointerInput::Touch {
            kind: TouchKind::End,
            touches: vec![],
        };
        let sample = input.normalize(&Bounds::default());
        assert_eq!(sample.phase, PointerPhase::Release);
        assert_eq!(sample.point, None);
    }

    #[test]
    fn test_non_finite_coordinates_dropped() {
        let input = PointerInput::Mouse {
            kind: MouseKind::Move,
            client_x: f32::NAN,
            client_y: 1.0,
        };
        assert_eq!(input.client_position(), None);
    }
}
