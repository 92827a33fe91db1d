//! Pointer input to stroke translation

use tracing::debug;

use crate::input::{PointerInput, PointerPhase, PointerSample};
use crate::types::{PixelRect, Point, StrokeStyle};

use super::SurfaceManager;

/// One rendered segment in logical coordinates; `from == to` is a dot
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct StrokeOp {
    pub from: Point,
    pub to: Point,
    pub style: StrokeStyle,
}

/// State between a press and its release
#[derive(Debug, Clone, Copy)]
pub(crate) struct StrokeSession {
    pub last: Point,
    /// Captured at press; later tool changes apply to the next stroke
    pub style: StrokeStyle,
    /// Whether any segment has been drawn yet
    pub rendered: bool,
}

impl SurfaceManager {
    /// Feed a raw pointer event
    ///
    /// Returns the region this event changed, if any. The same region is
    /// also folded into the dirty region.
    pub fn handle_pointer(&mut self, input: &PointerInput) -> Option<PixelRect> {
        let bounds = *self.surface.as_ref()?.bounds();
        self.handle_sample(input.normalize(&bounds))
    }

    /// Feed a normalized pointer sample
    pub fn handle_sample(&mut self, sample: PointerSample) -> Option<PixelRect> {
        if self.surface.is_none() {
            return None;
        }
        let before = self.dirty.take();

        match sample.phase {
            PointerPhase::Press => {
                let Some(point) = sample.point else {
                    debug!("Press without coordinates, ignoring");
                    self.dirty = before;
                    return None;
                };
                self.finish_stroke();
                self.begin_stroke(point);
            }
            PointerPhase::Drag => {
                if let Some(point) = sample.point {
                    self.extend_stroke(point);
                }
            }
            PointerPhase::Release => self.finish_stroke(),
        }

        let changed = self.dirty.take();
        self.dirty = before;
        if let Some(rect) = changed {
            self.mark_dirty(rect);
        }
        changed
    }

    /// Begin a session at `point`; nothing is drawn until it moves or ends
    pub(crate) fn begin_stroke(&mut self, point: Point) {
        self.session = Some(StrokeSession {
            last: point,
            style: self.style,
            rendered: false,
        });
    }

    /// Draw the segment from the last point to `point`
    pub(crate) fn extend_stroke(&mut self, point: Point) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let op = StrokeOp {
            from: session.last,
            to: point,
            style: session.style,
        };
        session.last = point;
        session.rendered = true;
        self.render(op);
    }

    /// End the active session, leaving a dot if it never moved
    pub(crate) fn finish_stroke(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        if !session.rendered {
            self.stamp(session.last, session.style);
        }
    }
}
