//! Display-space to canvas-space coordinate mapping.
//!
//! The canvas has fixed logical dimensions; on screen it is rendered at an
//! arbitrary size (zoom scales the rendered box, not the logical one), so
//! pointer positions must be mapped through the rendered bounding box.

use crate::template::{CANVAS_HEIGHT, CANVAS_WIDTH};

/// A point in display (pointer) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayPoint {
    pub x: f64,
    pub y: f64,
}

/// A point in canvas-space coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasPoint {
    pub x: f64,
    pub y: f64,
}

/// The on-screen rendered bounding box of the canvas surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub origin_x: f64,
    pub origin_y: f64,
    pub rendered_width: f64,
    pub rendered_height: f64,
}

impl Viewport {
    pub fn new(origin_x: f64, origin_y: f64, rendered_width: f64, rendered_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            rendered_width,
            rendered_height,
        }
    }

    /// A viewport rendering the canvas at a uniform zoom factor, top-left at
    /// the display origin.
    pub fn at_zoom(zoom: f64) -> Self {
        Self::new(0.0, 0.0, CANVAS_WIDTH * zoom, CANVAS_HEIGHT * zoom)
    }

    /// Map a pointer position to canvas space.
    ///
    /// Zoom never appears here: zoom changes the rendered box, not the
    /// logical dimensions, so the ratio self-corrects.
    pub fn to_canvas(&self, p: DisplayPoint) -> CanvasPoint {
        CanvasPoint {
            x: (p.x - self.origin_x) * (CANVAS_WIDTH / self.rendered_width),
            y: (p.y - self.origin_y) * (CANVAS_HEIGHT / self.rendered_height),
        }
    }

    /// Map a canvas-space position back to display coordinates.
    pub fn to_display(&self, c: CanvasPoint) -> DisplayPoint {
        DisplayPoint {
            x: self.origin_x + c.x * (self.rendered_width / CANVAS_WIDTH),
            y: self.origin_y + c.y * (self.rendered_height / CANVAS_HEIGHT),
        }
    }
}

impl Default for Viewport {
    /// Canvas rendered at native size.
    fn default() -> Self {
        Self::at_zoom(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 0.5;

    #[test]
    fn pointer_maps_through_zoomed_viewport() {
        // 0.6 zoom: rendered box 673.8 x 476.4 at the display origin
        let viewport = Viewport::new(0.0, 0.0, 673.8, 476.4);
        let c = viewport.to_canvas(DisplayPoint { x: 200.0, y: 150.0 });
        assert!((c.x - 333.3).abs() < EPSILON, "x = {}", c.x);
        assert!((c.y - 250.0).abs() < EPSILON, "y = {}", c.y);
    }

    #[test]
    fn origin_offset_is_subtracted_first() {
        let viewport = Viewport::new(40.0, 25.0, CANVAS_WIDTH, CANVAS_HEIGHT);
        let c = viewport.to_canvas(DisplayPoint { x: 40.0, y: 25.0 });
        assert_eq!(c.x, 0.0);
        assert_eq!(c.y, 0.0);
    }

    #[test]
    fn mapping_is_invertible() {
        let viewport = Viewport::at_zoom(1.4);
        let original = DisplayPoint { x: 312.7, y: 598.1 };
        let there = viewport.to_canvas(original);
        let back = viewport.to_display(there);
        assert!((back.x - original.x).abs() < 1e-9);
        assert!((back.y - original.y).abs() < 1e-9);
    }

    #[test]
    fn off_canvas_pointers_are_not_clamped() {
        let viewport = Viewport::at_zoom(1.0);
        let c = viewport.to_canvas(DisplayPoint { x: -50.0, y: 900.0 });
        assert!(c.x < 0.0);
        assert!(c.y > CANVAS_HEIGHT);
    }
}
