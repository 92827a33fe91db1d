//! Resize handling with content-preserving redraw
//!
//! Recreating the buffer drops its pixels, so the old contents are
//! snapshotted first and handed back to the host as a [`RedrawJob`]. The
//! rescale runs off the owning task; until it lands the new buffer shows
//! the background plus whatever is drawn in the meantime, and those strokes
//! are replayed on top of the redrawn snapshot.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::codec::{self, Bitmap, CodecError};
use crate::context::{Surface, physical_size};
use crate::types::Bounds;

use super::SurfaceManager;

/// Snapshot awaiting redraw into the current buffer
#[derive(Debug, Clone)]
pub(crate) struct PendingRedraw {
    pub generation: u64,
    pub snapshot: Arc<Bitmap>,
}

/// Rescale work produced by [`SurfaceManager::resize`]
#[derive(Debug, Clone)]
pub struct RedrawJob {
    generation: u64,
    snapshot: Arc<Bitmap>,
    width: u32,
    height: u32,
}

/// Result of a [`RedrawJob`], ready for [`SurfaceManager::complete_redraw`]
#[derive(Debug)]
pub struct RescaledBitmap {
    pub generation: u64,
    pub bitmap: Bitmap,
}

impl RedrawJob {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Target physical size
    pub fn target_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Rescale on the current thread
    pub fn run_blocking(self) -> RescaledBitmap {
        RescaledBitmap {
            generation: self.generation,
            bitmap: codec::rescale(&self.snapshot, self.width, self.height),
        }
    }

    /// Rescale on a blocking worker
    pub async fn run(self) -> Result<RescaledBitmap, CodecError> {
        tokio::task::spawn_blocking(move || self.run_blocking())
            .await
            .map_err(|e| CodecError::Task(e.to_string()))
    }
}

impl SurfaceManager {
    /// Track a container resize
    ///
    /// The first valid call creates the buffer filled with the background.
    /// Later calls that change the physical size recreate the buffer and
    /// return the redraw job for the previous contents. Invalid sizes are
    /// ignored and leave the current surface (if any) in place.
    pub fn resize(&mut self, bounds: Bounds, scale: f32) -> Option<RedrawJob> {
        let Some((width, height)) = physical_size(&bounds, scale) else {
            warn!(
                "Ignoring resize to {}x{} at scale {}",
                bounds.width, bounds.height, scale
            );
            return None;
        };

        let Some(current) = self.surface.as_mut() else {
            let mut surface = Surface::new(bounds, scale)?;
            let rect = surface.fill_background();
            info!("Surface ready: {}x{} physical", width, height);
            self.surface = Some(surface);
            self.mark_dirty(rect);
            return None;
        };

        let same_buffer = current.physical_width() == width
            && current.physical_height() == height
            && current.scale() == scale;
        if same_buffer {
            // Logical size may still differ by a fraction of a pixel
            current.set_bounds(bounds);
            return None;
        }

        // A resize during a pending redraw keeps the original snapshot
        let snapshot = match self.pending.take() {
            Some(pending) => pending.snapshot,
            None => Arc::new(current.snapshot()),
        };

        let mut surface = Surface::new(bounds, scale)?;
        let rect = surface.fill_background();
        self.surface = Some(surface);
        self.mark_dirty(rect);

        self.generation += 1;
        self.pending = Some(PendingRedraw {
            generation: self.generation,
            snapshot: Arc::clone(&snapshot),
        });

        // Interim view: strokes made since the snapshot, on the background
        for op in self.deferred.clone() {
            if let Some(surface) = self.surface.as_mut() {
                surface.stroke_segment(op.from, op.to, &op.style);
            }
        }

        debug!(
            "Resized to {}x{} physical, redraw generation {}",
            width, height, self.generation
        );

        Some(RedrawJob {
            generation: self.generation,
            snapshot,
            width,
            height,
        })
    }

    /// Draw a finished redraw into the buffer
    ///
    /// Results from superseded resizes are dropped. Returns whether the
    /// bitmap was applied.
    pub fn complete_redraw(&mut self, rescaled: RescaledBitmap) -> bool {
        let current = self.pending.as_ref().map(|p| p.generation);
        if current != Some(rescaled.generation) {
            debug!(
                "Dropping stale redraw {} (pending {:?})",
                rescaled.generation, current
            );
            return false;
        }
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };

        let rect = surface.draw_bitmap(&rescaled.bitmap);
        self.pending = None;
        for op in std::mem::take(&mut self.deferred) {
            surface.stroke_segment(op.from, op.to, &op.style);
        }
        self.mark_dirty(rect);
        true
    }

    /// Finish the redraw for `generation` on the current thread
    ///
    /// For hosts whose background rescale failed: the pending snapshot is
    /// rescaled here so neither the drawing nor the deferred strokes are
    /// lost. Returns false for a stale generation.
    pub fn recover_redraw(&mut self, generation: u64) -> bool {
        let Some(pending) = self.pending.as_ref().filter(|p| p.generation == generation) else {
            debug!("No pending redraw {} to recover", generation);
            return false;
        };
        let Some((width, height)) = self.physical_size() else {
            return false;
        };
        let bitmap = codec::rescale(&pending.snapshot, width, height);
        self.complete_redraw(RescaledBitmap { generation, bitmap })
    }
}
