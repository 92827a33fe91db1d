//! Surface operations exposed to the host: clear, export, import and
//! dirty-region readback

use tracing::{debug, warn};

use crate::codec::{self, Bitmap, ImageFormat};
use crate::constants::{DEFAULT_EXPORT_MIME, DEFAULT_EXPORT_QUALITY};
use crate::types::PixelRect;

use super::{SurfaceError, SurfaceManager};

/// A data URI waiting to be decoded off the owning task
#[derive(Debug, Clone)]
pub struct ImportJob {
    data: String,
}

impl ImportJob {
    /// Decode on a blocking worker
    pub async fn decode(self) -> Result<Bitmap, SurfaceError> {
        Ok(codec::decode_data_uri_async(self.data).await?)
    }
}

impl SurfaceManager {
    /// Fill the whole area with the background color
    ///
    /// Always paints over, whatever the current tool. No-op when not ready.
    pub fn clear(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let rect = surface.fill_background();
        // Anything drawn before now is gone, including a pending redraw
        self.pending = None;
        self.deferred.clear();
        self.mark_dirty(rect);
    }

    /// Encode the buffer as a data URI
    ///
    /// `mime` defaults to PNG and `quality` (0-1, JPEG only) to maximum.
    /// Returns None when not ready or if encoding fails.
    pub fn export(&self, mime: Option<&str>, quality: Option<f32>) -> Option<String> {
        let format = ImageFormat::from_mime(mime.unwrap_or(DEFAULT_EXPORT_MIME));
        let bytes = self.export_bytes(format, quality.unwrap_or(DEFAULT_EXPORT_QUALITY))?;
        Some(codec::to_data_uri(&bytes, format))
    }

    /// Encode the buffer to raw image bytes
    pub fn export_bytes(&self, format: ImageFormat, quality: f32) -> Option<Vec<u8>> {
        let surface = self.surface.as_ref()?;
        match codec::encode_bitmap(surface.buffer().image(), format, quality) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!("Export failed: {}", e);
                None
            }
        }
    }

    /// Decode `data` and draw it over the full area, replacing the contents
    ///
    /// The buffer is untouched unless decoding succeeds.
    pub async fn import(&mut self, data: String) -> Result<(), SurfaceError> {
        let job = self.prepare_import(data)?;
        let bitmap = job.decode().await?;
        self.apply_import(&bitmap)
    }

    /// First half of [`import`](Self::import): check readiness and hand back the decode
    pub fn prepare_import(&self, data: String) -> Result<ImportJob, SurfaceError> {
        if self.surface.is_none() {
            return Err(SurfaceError::NotReady);
        }
        Ok(ImportJob { data })
    }

    /// Second half of [`import`](Self::import): draw a decoded bitmap
    ///
    /// Supersedes any pending resize redraw.
    pub fn apply_import(&mut self, bitmap: &Bitmap) -> Result<(), SurfaceError> {
        let surface = self.surface.as_mut().ok_or(SurfaceError::NotReady)?;
        let rect = surface.draw_bitmap(bitmap);
        if self.pending.take().is_some() {
            debug!("Import replaced a pending redraw");
        }
        self.deferred.clear();
        self.mark_dirty(rect);
        Ok(())
    }

    /// Take the region changed since the last call
    pub fn take_dirty_region(&mut self) -> Option<PixelRect> {
        self.dirty.take()
    }

    /// Copy of a physical region of the buffer, clamped to its bounds
    pub fn region_image(&self, rect: PixelRect) -> Option<Bitmap> {
        let region = self.surface.as_ref()?.region(rect);
        (region.width() > 0 && region.height() > 0).then_some(region)
    }
}
