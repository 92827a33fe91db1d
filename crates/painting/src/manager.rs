//! Canvas surface manager
//!
//! Connects the pieces a host needs to run a drawing area:
//! - Container resizes (buffer recreation plus an async redraw of the old content)
//! - Tool state (stroke color, width and composite mode)
//! - Pointer input (the stroke state machine)
//! - Clear, export and import of the bitmap
//! - Dirty region tracking so the host can repaint only what changed
//!
//! The manager holds no runtime handle. Anything slow (decode, rescale) is
//! handed back to the host as a job it can await on its own executor.

mod resize;
mod stroke;
mod surface_ops;

use thiserror::Error;
use tracing::{debug, warn};

use crate::codec::CodecError;
use crate::context::Surface;
use crate::types::{PixelRect, Point, StrokeStyle, Tool};
use crate::validation::{ColorError, is_valid_width, parse_hex_color};

pub use resize::{RedrawJob, RescaledBitmap};
pub use surface_ops::ImportJob;

use resize::PendingRedraw;
use stroke::{StrokeOp, StrokeSession};

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Surface not ready")]
    NotReady,

    #[error("Failed to load image into surface: {0}")]
    Decode(#[from] CodecError),
}

/// Owns the drawing surface and everything that mutates it
#[derive(Debug, Default)]
pub struct SurfaceManager {
    /// None until the first valid resize
    pub(crate) surface: Option<Surface>,
    /// Style applied to strokes begun from now on
    pub(crate) style: StrokeStyle,
    pub(crate) tool: Tool,
    /// Active stroke (None when idle)
    pub(crate) session: Option<StrokeSession>,
    /// Redraw waiting on the host's rescale
    pub(crate) pending: Option<PendingRedraw>,
    /// Stroke ops rendered while a redraw is pending, replayed on completion
    pub(crate) deferred: Vec<StrokeOp>,
    /// Bumped on every resize that schedules a redraw
    pub(crate) generation: u64,
    /// Union of regions changed since the last `take_dirty_region`
    pub(crate) dirty: Option<PixelRect>,
}

impl SurfaceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a valid resize has created the buffer
    pub fn is_ready(&self) -> bool {
        self.surface.is_some()
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    /// Physical buffer size, if ready
    pub fn physical_size(&self) -> Option<(u32, u32)> {
        self.surface
            .as_ref()
            .map(|s| (s.physical_width(), s.physical_height()))
    }

    /// Read a physical pixel, if ready and in bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.surface.as_ref()?.buffer().get_pixel(x, y)
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Whether a stroke session is active
    pub fn is_drawing(&self) -> bool {
        self.session.is_some()
    }

    /// Whether a resize redraw is still waiting for its rescaled bitmap
    pub fn is_redraw_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Select the tool; the composite mode follows it
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
        self.style.mode = tool.composite_mode();
    }

    /// Set the stroke color from a hex string
    ///
    /// An invalid color is rejected and the previous color stays in effect.
    pub fn set_color(&mut self, color: &str) -> Result<(), ColorError> {
        match parse_hex_color(color) {
            Ok(rgba) => {
                self.style.color = rgba;
                Ok(())
            }
            Err(e) => {
                warn!("Ignoring stroke color: {}", e);
                Err(e)
            }
        }
    }

    /// Set the stroke width in logical pixels
    ///
    /// Returns false (keeping the old width) for non-finite or non-positive values.
    pub fn set_width(&mut self, width: f32) -> bool {
        if !is_valid_width(width) {
            warn!("Ignoring stroke width {}", width);
            return false;
        }
        self.style.width = width;
        true
    }

    /// Push the full tool state at once
    pub fn apply_tool(&mut self, tool: Tool, color: &str, width: f32) {
        self.set_tool(tool);
        // Rejections are logged by the setters
        let _ = self.set_color(color);
        self.set_width(width);
        debug!("Tool applied: {:?} {:?}", tool, self.style);
    }

    pub(crate) fn mark_dirty(&mut self, rect: PixelRect) {
        if rect.is_empty() {
            return;
        }
        self.dirty = Some(match self.dirty {
            Some(existing) => existing.union(&rect),
            None => rect,
        });
    }

    /// Render one stroke op, recording it if a redraw will overwrite it
    pub(crate) fn render(&mut self, op: StrokeOp) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let rect = surface.stroke_segment(op.from, op.to, &op.style);
        if self.pending.is_some() {
            self.deferred.push(op);
        }
        if let Some(rect) = rect {
            self.mark_dirty(rect);
        }
    }

    /// Logical-space dot helper used by the state machine
    pub(crate) fn stamp(&mut self, point: Point, style: StrokeStyle) {
        self.render(StrokeOp {
            from: point,
            to: point,
            style,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{ImageFormat, decode_data_uri};
    use crate::constants::BACKGROUND_COLOR;
    use crate::input::{MouseKind, PointerInput};
    use crate::types::{Bounds, CompositeMode};

    const BLACK: [u8; 4] = [0, 0, 0, 255];

    fn ready(width: f32, height: f32) -> SurfaceManager {
        let mut manager = SurfaceManager::new();
        assert!(manager.resize(Bounds::sized(width, height), 1.0).is_none());
        manager
    }

    fn mouse(kind: MouseKind, x: f32, y: f32) -> PointerInput {
        PointerInput::Mouse {
            kind,
            client_x: x,
            client_y: y,
        }
    }

    fn line(manager: &mut SurfaceManager, from: (f32, f32), to: (f32, f32)) {
        manager.handle_pointer(&mouse(MouseKind::Down, from.0, from.1));
        manager.handle_pointer(&mouse(MouseKind::Move, to.0, to.1));
        manager.handle_pointer(&mouse(MouseKind::Up, to.0, to.1));
    }

    #[test]
    fn test_not_ready_until_resized() {
        let mut manager = SurfaceManager::new();
        assert!(!manager.is_ready());
        assert_eq!(manager.export(None, None), None);

        manager.clear();
        manager.handle_pointer(&mouse(MouseKind::Down, 1.0, 1.0));
        assert!(!manager.is_drawing());
        assert_eq!(manager.take_dirty_region(), None);
    }

    #[test]
    fn test_set_tool_updates_mode() {
        let mut manager = SurfaceManager::new();
        manager.set_tool(Tool::Eraser);
        assert_eq!(manager.style().mode, CompositeMode::Erase);
        manager.set_tool(Tool::Pencil);
        assert_eq!(manager.style().mode, CompositeMode::PaintOver);
    }

    #[test]
    fn test_invalid_color_keeps_previous() {
        let mut manager = SurfaceManager::new();
        manager.set_color("#FF0000").unwrap();
        assert!(manager.set_color("crimson").is_err());
        assert_eq!(manager.style().color, [255, 0, 0, 255]);
    }

    #[test]
    fn test_invalid_width_ignored() {
        let mut manager = SurfaceManager::new();
        assert!(manager.set_width(12.0));
        assert!(!manager.set_width(0.0));
        assert!(!manager.set_width(f32::NAN));
        assert_eq!(manager.style().width, 12.0);
    }

    #[test]
    fn test_fresh_surface_exports_opaque_white() {
        let manager = ready(800.0, 600.0);

        let uri = manager.export(Some("image/png"), None).unwrap();
        let bitmap = decode_data_uri(&uri).unwrap();

        assert_eq!(bitmap.dimensions(), (800, 600));
        assert!(bitmap.pixels().all(|p| p.0 == BACKGROUND_COLOR));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut manager = ready(64.0, 64.0);
        line(&mut manager, (5.0, 5.0), (60.0, 60.0));

        manager.clear();
        let once = manager.export_bytes(ImageFormat::Png, 1.0).unwrap();
        manager.clear();
        let twice = manager.export_bytes(ImageFormat::Png, 1.0).unwrap();

        assert_eq!(once, twice);
        assert_eq!(manager.pixel(32, 32), Some(BACKGROUND_COLOR));
    }

    #[test]
    fn test_clear_ignores_eraser_mode() {
        let mut manager = ready(16.0, 16.0);
        manager.set_tool(Tool::Eraser);
        manager.clear();

        assert_eq!(manager.pixel(8, 8), Some(BACKGROUND_COLOR));
        assert_eq!(manager.style().mode, CompositeMode::Erase);
    }

    #[test]
    fn test_eraser_then_pencil() {
        let mut manager = ready(64.0, 64.0);
        manager.set_width(10.0);

        manager.set_tool(Tool::Eraser);
        line(&mut manager, (10.0, 32.0), (54.0, 32.0));
        let erased = manager.pixel(32, 32).unwrap();
        assert!(erased[3] < 255);

        manager.set_tool(Tool::Pencil);
        line(&mut manager, (10.0, 32.0), (54.0, 32.0));
        assert_eq!(manager.pixel(32, 32), Some(BLACK));
    }

    #[tokio::test]
    async fn test_export_import_round_trip() {
        let mut manager = ready(40.0, 30.0);
        manager.set_color("#0000FF").unwrap();
        line(&mut manager, (5.0, 5.0), (35.0, 25.0));
        manager.set_tool(Tool::Eraser);
        line(&mut manager, (5.0, 25.0), (35.0, 5.0));

        let before = manager.surface().unwrap().snapshot();
        let uri = manager.export(None, None).unwrap();

        manager.clear();
        manager.import(uri).await.unwrap();

        assert_eq!(manager.surface().unwrap().snapshot(), before);
    }

    #[tokio::test]
    async fn test_import_garbage_leaves_buffer() {
        let mut manager = ready(32.0, 32.0);
        line(&mut manager, (4.0, 4.0), (28.0, 28.0));
        let before = manager.surface().unwrap().snapshot();

        let result = manager.import("not-a-valid-data-uri".to_string()).await;

        assert!(matches!(result, Err(SurfaceError::Decode(_))));
        assert_eq!(manager.surface().unwrap().snapshot(), before);
    }

    #[tokio::test]
    async fn test_import_not_ready() {
        let mut manager = SurfaceManager::new();
        let result = manager.import("data:image/png;base64,".to_string()).await;
        assert!(matches!(result, Err(SurfaceError::NotReady)));
    }

    #[tokio::test]
    async fn test_resize_preserves_drawing() {
        let mut manager = ready(100.0, 100.0);
        manager.set_width(8.0);
        line(&mut manager, (10.0, 50.0), (90.0, 50.0));

        let job = manager.resize(Bounds::sized(200.0, 200.0), 1.0).unwrap();
        let rescaled = job.run().await.unwrap();
        assert!(manager.complete_redraw(rescaled));

        let uri = manager.export(None, None).unwrap();
        let bitmap = decode_data_uri(&uri).unwrap();
        assert_eq!(bitmap.dimensions(), (200, 200));
        // The line now runs along y = 100
        let pixel = bitmap.get_pixel(100, 100).0;
        assert!(pixel[0] < 64 && pixel[3] == 255);
        assert!(bitmap.get_pixel(100, 20).0.iter().all(|c| *c >= 250));
    }
}
