//! Conversions between IPC wire types and painting types

use doodle_ipc::{
    CanvasBounds, MouseEventKind, PointerEvent, RegionUpdate, SurfaceInfo, ToolKind,
    TouchEventKind,
};
use painting::{Bounds, ImageFormat, MouseKind, PixelRect, PointerInput, Surface, Tool, TouchKind};
use tracing::warn;

use doodle_config::DisplayConfig;

pub fn to_bounds(bounds: CanvasBounds) -> Bounds {
    Bounds::new(bounds.left, bounds.top, bounds.width, bounds.height)
}

pub fn to_tool(tool: ToolKind) -> Tool {
    match tool {
        ToolKind::Pencil => Tool::Pencil,
        ToolKind::Eraser => Tool::Eraser,
    }
}

pub fn to_pointer_input(event: PointerEvent) -> PointerInput {
    match event {
        PointerEvent::Mouse {
            kind,
            client_x,
            client_y,
        } => PointerInput::Mouse {
            kind: match kind {
                MouseEventKind::Down => MouseKind::Down,
                MouseEventKind::Move => MouseKind::Move,
                MouseEventKind::Up => MouseKind::Up,
                MouseEventKind::Leave => MouseKind::Leave,
            },
            client_x,
            client_y,
        },
        PointerEvent::Touch { kind, touches } => PointerInput::Touch {
            kind: match kind {
                TouchEventKind::Start => TouchKind::Start,
                TouchEventKind::Move => TouchKind::Move,
                TouchEventKind::End => TouchKind::End,
            },
            touches: touches.iter().map(|t| [t.client_x, t.client_y]).collect(),
        },
    }
}

/// Describe the surface geometry for the UI
pub fn surface_info(surface: &Surface) -> SurfaceInfo {
    let bounds = surface.bounds();
    let display = DisplayConfig::new(bounds.width, bounds.height, surface.scale());
    SurfaceInfo {
        width: display.width,
        height: display.height,
        scale: display.scale,
        physical_width: display.scaled_width(),
        physical_height: display.scaled_height(),
    }
}

/// Encode a region of the surface for repainting
pub fn region_update(surface: &Surface, rect: PixelRect) -> Option<RegionUpdate> {
    let image = surface.region(rect);
    if image.width() == 0 || image.height() == 0 {
        return None;
    }
    match painting::encode_data_uri(&image, ImageFormat::Png, 1.0) {
        Ok(data) => Some(RegionUpdate {
            x: rect.x,
            y: rect.y,
            width: image.width(),
            height: image.height(),
            data,
        }),
        Err(e) => {
            warn!("Failed to encode region update: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doodle_ipc::TouchPoint;

    #[test]
    fn test_touch_conversion_keeps_order() {
        let input = to_pointer_input(PointerEvent::Touch {
            kind: TouchEventKind::Move,
            touches: vec![
                TouchPoint {
                    client_x: 1.0,
                    client_y: 2.0,
                },
                TouchPoint {
                    client_x: 3.0,
                    client_y: 4.0,
                },
            ],
        });

        assert_eq!(
            input,
            PointerInput::Touch {
                kind: TouchKind::Move,
                touches: vec![[1.0, 2.0], [3.0, 4.0]],
            }
        );
    }

    #[test]
    fn test_surface_info_matches_buffer() {
        let surface = Surface::new(Bounds::sized(100.5, 40.0), 2.0).unwrap();
        let info = surface_info(&surface);

        assert_eq!(info.physical_width, surface.physical_width());
        assert_eq!(info.physical_height, surface.physical_height());
        assert_eq!(info.scale, 2.0);
    }

    #[test]
    fn test_region_update_is_png() {
        let mut surface = Surface::new(Bounds::sized(10.0, 10.0), 1.0).unwrap();
        surface.fill_background();

        let update = region_update(&surface, PixelRect::new(2, 3, 4, 5)).unwrap();
        assert_eq!((update.x, update.y, update.width, update.height), (2, 3, 4, 5));
        assert!(update.data.starts_with("data:image/png;base64,"));
    }
}
