#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

/// A point in either screen or world space.
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

    /// Both coordinates are finite (not NaN or infinite).
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Camera state for pan/zoom over the background image.
///
/// `pan_x` / `pan_y` are in CSS pixels and are applied before the zoom scale,
/// so panning speed does not depend on zoom.
/// `zoom` is a scale factor (1.0 = native image size).
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
    /// Convert a screen-space point (CSS pixels) to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        crate::geometry::screen_to_world(screen, self.position(), self.zoom)
    }

    /// Convert a world-space point to screen coordinates (CSS pixels).
    ///
    /// Matches the renderer's `translate(pan)` followed by `scale(zoom)`.
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.zoom + self.pan_x,
            y: world.y * self.zoom + self.pan_y,
        }
    }

    /// The pan offset as a point.
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.pan_x, self.pan_y)
    }

    /// Shift the pan offset by a raw screen-pixel delta.
    pub fn pan_by(&mut self, delta: Point) {
        self.pan_x += delta.x;
        self.pan_y += delta.y;
    }

    /// Change zoom additively, never dropping below `min_zoom`.
    pub fn zoom_by(&mut self, delta: f64, min_zoom: f64) {
        self.zoom = (self.zoom + delta).max(min_zoom);
    }

    /// Return to the origin at native scale.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
