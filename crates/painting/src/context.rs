//! The drawing surface: a CPU buffer plus its logical-to-physical transform
//!
//! All public drawing calls take logical (CSS pixel) coordinates; the surface
//! scales them by the device pixel ratio before touching the buffer.

use tracing::{debug, warn};

use crate::codec::{self, Bitmap};
use crate::constants::{BACKGROUND_COLOR, MAX_SURFACE_DIMENSION};
use crate::surface::CpuSurface;
use crate::types::{Bounds, CompositeMode, PixelRect, Point, StrokeStyle};

/// Compute the physical buffer size for `bounds` at `scale`
///
/// Returns None when the platform would refuse the buffer: a non-finite or
/// non-positive scale, an empty axis, or an axis above
/// [`MAX_SURFACE_DIMENSION`].
pub fn physical_size(bounds: &Bounds, scale: f32) -> Option<(u32, u32)> {
    if !scale.is_finite() || scale <= 0.0 {
        return None;
    }
    let axis = |logical: f32| {
        if !logical.is_finite() || logical <= 0.0 {
            return None;
        }
        let physical = (logical * scale).floor();
        (physical >= 1.0 && physical <= MAX_SURFACE_DIMENSION as f32).then_some(physical as u32)
    };
    Some((axis(bounds.width)?, axis(bounds.height)?))
}

/// A sized raster buffer owned by the surface manager
#[derive(Debug, Clone)]
pub struct Surface {
    buffer: CpuSurface,
    bounds: Bounds,
    scale: f32,
}

impl Surface {
    /// Create a transparent surface for `bounds` at `scale`
    pub fn new(bounds: Bounds, scale: f32) -> Option<Self> {
        let Some((width, height)) = physical_size(&bounds, scale) else {
            warn!(
                "Refusing surface of {}x{} at scale {}",
                bounds.width, bounds.height, scale
            );
            return None;
        };
        debug!(
            "Created surface {}x{} logical, {}x{} physical",
            bounds.width, bounds.height, width, height
        );
        Some(Self {
            buffer: CpuSurface::new(width, height),
            bounds,
            scale,
        })
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Replace the on-screen placement without touching the buffer
    ///
    /// Only valid when `bounds` maps to the current physical size.
    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn physical_width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn physical_height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn buffer(&self) -> &CpuSurface {
        &self.buffer
    }

    /// Whole-buffer rectangle
    pub fn full_rect(&self) -> PixelRect {
        PixelRect::new(0, 0, self.buffer.width(), self.buffer.height())
    }

    #[inline]
    fn to_physical(&self, point: Point) -> (f32, f32) {
        (point.x * self.scale, point.y * self.scale)
    }

    /// Render one stroke segment between two logical points
    pub fn stroke_segment(&mut self, from: Point, to: Point, style: &StrokeStyle) -> Option<PixelRect> {
        let radius = style.width * self.scale * 0.5;
        let (start, end) = (self.to_physical(from), self.to_physical(to));
        self.buffer.stroke_capsule(start, end, radius, style.color, style.mode)
    }

    /// Paint the background color over everything, ignoring the tool's mode
    pub fn fill_background(&mut self) -> PixelRect {
        self.buffer.fill_composite(BACKGROUND_COLOR, CompositeMode::PaintOver)
    }

    /// Replace the contents with `bitmap` stretched over the full logical area
    pub fn draw_bitmap(&mut self, bitmap: &Bitmap) -> PixelRect {
        let (width, height) = (self.buffer.width(), self.buffer.height());
        if bitmap.dimensions() == (width, height) {
            self.buffer.replace_with(bitmap);
        } else {
            let scaled = codec::rescale(bitmap, width, height);
            self.buffer.replace_with(&scaled);
        }
        self.full_rect()
    }

    /// Copy of the current pixels
    pub fn snapshot(&self) -> Bitmap {
        self.buffer.image().clone()
    }

    /// Copy of a rectangular region, clamped to the buffer
    pub fn region(&self, rect: PixelRect) -> Bitmap {
        let x = rect.x.min(self.buffer.width());
        let y = rect.y.min(self.buffer.height());
        let width = rect.width.min(self.buffer.width() - x);
        let height = rect.height.min(self.buffer.height() - y);
        image::imageops::crop_imm(self.buffer.image(), x, y, width, height).to_image()
    }
}
