//! CPU raster buffer - 8-bit straight-alpha RGBA storage

use image::RgbaImage;

/// An 8-bit RGBA CPU buffer in physical pixels
///
/// Pixels are stored with straight (non-premultiplied) alpha so the buffer
/// can be handed to the image encoders without conversion. Compositing math
/// runs in f32.
#[derive(Debug, Clone)]
pub struct CpuSurface {
    pixels: RgbaImage,
}

impl CpuSurface {
    /// Create a new buffer with the given dimensions, initialized to transparent black
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Fill the whole buffer with one color, replacing existing pixels
    pub fn fill(&mut self, color: [u8; 4]) {
        for pixel in self.pixels.pixels_mut() {
            pixel.0 = color;
        }
    }

    /// Get a pixel at the given coordinates
    /// Returns None if coordinates are out of bounds
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixels.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Source-over composite of `color` at `coverage` (0-1) onto a pixel
    #[inline]
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: [u8; 4], coverage: f32) {
        let Some(pixel) = self.pixels.get_pixel_mut_checked(x, y) else {
            return;
        };
        let dst = pixel.0;

        let src_alpha = unit(color[3]) * coverage.clamp(0.0, 1.0);
        let dst_alpha = unit(dst[3]);
        let out_alpha = src_alpha + dst_alpha * (1.0 - src_alpha);
        if out_alpha <= f32::EPSILON {
            pixel.0 = [0, 0, 0, 0];
            return;
        }

        let channel = |i: usize| {
            let value =
                (unit(color[i]) * src_alpha + unit(dst[i]) * dst_alpha * (1.0 - src_alpha)) / out_alpha;
            to_byte(value)
        };
        pixel.0 = [channel(0), channel(1), channel(2), to_byte(out_alpha)];
    }

    /// Destination-out composite: removes `alpha * coverage` of the existing paint
    #[inline]
    pub fn erase_pixel(&mut self, x: u32, y: u32, alpha: u8, coverage: f32) {
        let Some(pixel) = self.pixels.get_pixel_mut_checked(x, y) else {
            return;
        };
        let dst = pixel.0;

        let src_alpha = unit(alpha) * coverage.clamp(0.0, 1.0);
        let remaining = to_byte(unit(dst[3]) * (1.0 - src_alpha));
        pixel.0 = if remaining == 0 {
            [0, 0, 0, 0]
        } else {
            [dst[0], dst[1], dst[2], remaining]
        };
    }

    /// Replace the buffer contents with `image`, which must match the buffer size
    ///
    /// Returns false (and leaves the buffer alone) on a size mismatch.
    pub fn replace_with(&mut self, image: &RgbaImage) -> bool {
        if image.dimensions() != self.pixels.dimensions() {
            return false;
        }
        self.pixels.copy_from_slice(image.as_raw());
        true
    }

    /// Borrow the pixels as an image
    #[inline]
    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }
}

#[inline]
fn unit(value: u8) -> f32 {
    value as f32 / 255.0
}

#[inline]
fn to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
