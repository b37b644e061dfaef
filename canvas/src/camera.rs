//! Viewport transform between screen pixels and plan coordinates.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::{ZOOM_MAX, ZOOM_MIN};

/// 2D position; whether it is screen pixels or plan units depends on the caller.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Camera state for pan/zoom over the floor plan.
///
/// `pan_x` / `pan_y` are in screen pixels.
/// `zoom` is a scale factor (1.0 = no zoom), kept within `[ZOOM_MIN, ZOOM_MAX]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Plan position under a pointer at `screen`.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        let Point { x, y } = screen;
        Point::new((x - self.pan_x) / self.zoom, (y - self.pan_y) / self.zoom)
    }

    /// Pixel position where the plan point `world` is drawn.
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        let Point { x, y } = world;
        Point::new(self.pan_x + x * self.zoom, self.pan_y + y * self.zoom)
    }

    /// Plan length covered by `pixels` on screen; hit radii go through this.
    #[must_use]
    pub fn screen_dist_to_world(&self, pixels: f64) -> f64 {
        pixels / self.zoom
    }

    /// The pan offset as a point.
    #[must_use]
    pub fn pan(&self) -> Point {
        Point::new(self.pan_x, self.pan_y)
    }

    /// Replace the pan offset.
    pub fn set_pan(&mut self, pan: Point) {
        self.pan_x = pan.x;
        self.pan_y = pan.y;
    }

    /// Shift the pan offset by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Set the zoom factor, clamped to the allowed range. Non-finite input is ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
        }
    }

    /// Zoom to `zoom` while keeping the world point under `screen` fixed.
    pub fn zoom_about(&mut self, screen: Point, zoom: f64) {
        let anchor = self.screen_to_world(screen);
        self.set_zoom(zoom);
        self.pan_x = screen.x - anchor.x * self.zoom;
        self.pan_y = screen.y - anchor.y * self.zoom;
    }
}
