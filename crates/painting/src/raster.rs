//! Stroke rasterization onto a CPU surface
//!
//! Segments are rendered as capsules: a line with round caps, which also
//! gives round joins when consecutive segments share an end point. Edges are
//! anti-aliased with a one-pixel coverage ramp.

use tracing::debug;

use crate::surface::CpuSurface;
use crate::types::{CompositeMode, PixelRect};

impl CpuSurface {
    /// Render a capsule from `(x0, y0)` to `(x1, y1)` in physical pixels
    ///
    /// `radius` is half the line width in physical pixels. A zero-length
    /// segment renders a round dot.
    ///
    /// Returns the affected region, or None if nothing landed on the buffer.
    pub fn stroke_capsule(
        &mut self,
        (x0, y0): (f32, f32),
        (x1, y1): (f32, f32),
        radius: f32,
        color: [u8; 4],
        mode: CompositeMode,
    ) -> Option<PixelRect> {
        if !(radius > 0.0) || ![x0, y0, x1, y1].iter().all(|v| v.is_finite()) {
            debug!("stroke_capsule: skipped degenerate input");
            return None;
        }

        // One extra pixel for the anti-aliasing ramp
        let reach = radius + 1.0;
        let x_min_f = (x0.min(x1) - reach).floor();
        let y_min_f = (y0.min(y1) - reach).floor();
        let x_max_f = (x0.max(x1) + reach).ceil();
        let y_max_f = (y0.max(y1) + reach).ceil();

        let x_min = (x_min_f.max(0.0) as u32).min(self.width());
        let y_min = (y_min_f.max(0.0) as u32).min(self.height());
        let x_max = (x_max_f.max(0.0) as u32).min(self.width());
        let y_max = (y_max_f.max(0.0) as u32).min(self.height());

        if x_min >= x_max || y_min >= y_max {
            return None;
        }

        let dx = x1 - x0;
        let dy = y1 - y0;
        let length_sq = dx * dx + dy * dy;

        for py in y_min..y_max {
            for px in x_min..x_max {
                let cx = px as f32 + 0.5;
                let cy = py as f32 + 0.5;

                let distance = distance_to_segment(cx, cy, x0, y0, dx, dy, length_sq);
                let coverage = (radius + 0.5 - distance).clamp(0.0, 1.0);
                if coverage <= 0.0 {
                    continue;
                }

                match mode {
                    CompositeMode::PaintOver => self.blend_pixel(px, py, color, coverage),
                    CompositeMode::Erase => self.erase_pixel(px, py, color[3], coverage),
                }
            }
        }

        Some(PixelRect::new(x_min, y_min, x_max - x_min, y_max - y_min))
    }

    /// Composite a solid color over the whole buffer
    pub fn fill_composite(&mut self, color: [u8; 4], mode: CompositeMode) -> PixelRect {
        match mode {
            CompositeMode::PaintOver if color[3] == 255 => self.fill(color),
            CompositeMode::PaintOver => {
                for y in 0..self.height() {
                    for x in 0..self.width() {
                        self.blend_pixel(x, y, color, 1.0);
                    }
                }
            }
            CompositeMode::Erase => {
                for y in 0..self.height() {
                    for x in 0..self.width() {
                        self.erase_pixel(x, y, color[3], 1.0);
                    }
                }
            }
        }
        PixelRect::new(0, 0, self.width(), self.height())
    }
}

#[inline]
fn distance_to_segment(px: f32, py: f32, x0: f32, y0: f32, dx: f32, dy: f32, length_sq: f32) -> f32 {
    let t = if length_sq <= f32::EPSILON {
        0.0
    } else {
        (((px - x0) * dx + (py - y0) * dy) / length_sq).clamp(0.0, 1.0)
    };
    let nearest_x = x0 + dx * t;
    let nearest_y = y0 + dy * t;
    ((px - nearest_x).powi(2) + (py - nearest_y).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [u8; 4] = [255, 255, 255, 255];
    const BLACK: [u8; 4] = [0, 0, 0, 255];

    #[test]
    fn test_horizontal_segment() {
        let mut surface = CpuSurface::new(64, 64);
        surface.fill(WHITE);

        let region = surface
            .stroke_capsule((10.0, 32.0), (50.0, 32.0), 3.0, BLACK, CompositeMode::PaintOver)
            .unwrap();

        // On the line
        assert_eq!(surface.get_pixel(30, 32), Some(BLACK));
        // Well away from the line
        assert_eq!(surface.get_pixel(30, 10), Some(WHITE));
        assert!(region.x <= 10 && region.x + region.width >= 50);
    }

    #[test]
    fn test_round_caps() {
        let mut surface = CpuSurface::new(64, 64);
        surface.fill(WHITE);
        surface.stroke_capsule((20.0, 20.0), (40.0, 20.0), 4.0, BLACK, CompositeMode::PaintOver);

        // Cap extends past the end point along the axis...
        assert_eq!(surface.get_pixel(42, 19), Some(BLACK));
        // ...but not into the diagonal corner a square cap would fill
        assert_eq!(surface.get_pixel(44, 16), Some(WHITE));
    }

    #[test]
    fn test_zero_length_is_dot() {
        let mut surface = CpuSurface::new(32, 32);
        surface.fill(WHITE);

        let region = surface.stroke_capsule((16.0, 16.0), (16.0, 16.0), 2.5, BLACK, CompositeMode::PaintOver);

        assert!(region.is_some());
        assert_eq!(surface.get_pixel(16, 16), Some(BLACK));
        assert_eq!(surface.get_pixel(25, 16), Some(WHITE));
    }

    #[test]
    fn test_erase_mode_clears_alpha() {
        let mut surface = CpuSurface::new(32, 32);
        surface.fill(BLACK);

        surface.stroke_capsule((4.0, 16.0), (28.0, 16.0), 4.0, BLACK, CompositeMode::Erase);

        assert_eq!(surface.get_pixel(16, 16).map(|p| p[3]), Some(0));
        assert_eq!(surface.get_pixel(16, 2), Some(BLACK));
    }

    #[test]
    fn test_outside_surface() {
        let mut surface = CpuSurface::new(16, 16);
        let region = surface.stroke_capsule((-50.0, -50.0), (-40.0, -40.0), 2.0, BLACK, CompositeMode::PaintOver);
        assert!(region.is_none());
    }

    #[test]
    fn test_rejects_invalid_radius() {
        let mut surface = CpuSurface::new(16, 16);
        assert!(surface.stroke_capsule((1.0, 1.0), (5.0, 5.0), 0.0, BLACK, CompositeMode::PaintOver).is_none());
        assert!(surface.stroke_capsule((1.0, 1.0), (f32::NAN, 5.0), 2.0, BLACK, CompositeMode::PaintOver).is_none());
    }

    #[test]
    fn test_fill_composite_paint_over() {
        let mut surface = CpuSurface::new(8, 8);
        surface.fill(BLACK);

        let region = surface.fill_composite(WHITE, CompositeMode::PaintOver);

        assert_eq!(region, PixelRect::new(0, 0, 8, 8));
        assert_eq!(surface.get_pixel(2, 2), Some(WHITE));
    }
}
