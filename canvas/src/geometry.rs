//! Pure geometry helpers shared by the controller, hit-testing, and renderer.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use std::f64::consts::PI;

use crate::camera::Point;

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: Point, b: Point) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Midpoint of two points.
#[must_use]
pub fn center(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Round a coordinate to the nearest integer, halves toward positive infinity.
#[must_use]
pub fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Component-wise [`round_half_up`].
#[must_use]
pub fn rounded(p: Point) -> Point {
    Point::new(round_half_up(p.x), round_half_up(p.y))
}

/// Milliseconds elapsed between `start_ms` and `now_ms`.
#[must_use]
pub fn duration(start_ms: f64, now_ms: f64) -> f64 {
    now_ms - start_ms
}

/// `(p - camera_pos) / zoom`, per axis.
#[must_use]
pub fn screen_to_world(p: Point, camera_pos: Point, zoom: f64) -> Point {
    Point::new((p.x - camera_pos.x) / zoom, (p.y - camera_pos.y) / zoom)
}

/// Axis-aligned rectangle normalized so `min <= max` on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    /// Rectangle spanned by two arbitrary corners.
    #[must_use]
    pub fn spanning(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Square of side `size` centered on `c`.
    #[must_use]
    pub fn centered(c: Point, size: f64) -> Self {
        let half = size / 2.0;
        Self {
            min: Point::new(c.x - half, c.y - half),
            max: Point::new(c.x + half, c.y + half),
        }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// `p` lies strictly inside (edges excluded).
    #[must_use]
    pub fn contains_strict(&self, p: Point) -> bool {
        p.x > self.min.x && p.x < self.max.x && p.y > self.min.y && p.y < self.max.y
    }
}

/// Line plus filled triangular head, pulled back from the destination so the
/// head does not cover the glyph drawn there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrow {
    /// Start of the shaft.
    pub from: Point,
    /// Visual end of the shaft (destination moved back toward `from`).
    pub end: Point,
    /// Arrowhead vertices; the first points along the direction of travel.
    pub head: [Point; 3],
}

impl Arrow {
    /// Build the arrow from `from` toward `to`.
    ///
    /// The shaft stops `offset + radius / 2` short of `to`; the head is a
    /// triangle of circumradius `radius` centered `offset` short of `to`.
    /// Returns `None` when the endpoints coincide.
    #[must_use]
    pub fn new(from: Point, to: Point, radius: f64, offset: f64) -> Option<Self> {
        let vx = from.x - to.x;
        let vy = from.y - to.y;
        let mag = vx.hypot(vy);
        if !mag.is_finite() || mag <= f64::EPSILON {
            return None;
        }
        let nx = vx / mag;
        let ny = vy / mag;

        let pull = offset + radius / 2.0;
        let end = Point::new(to.x + nx * pull, to.y + ny * pull);
        let head_center = Point::new(end.x - nx * (radius / 2.0), end.y - ny * (radius / 2.0));

        let mut angle = (end.y - from.y).atan2(end.x - from.x);
        let mut head = [Point::default(); 3];
        for vertex in &mut head {
            *vertex = Point::new(
                radius.mul_add(angle.cos(), head_center.x),
                radius.mul_add(angle.sin(), head_center.y),
            );
            angle += 2.0 * PI / 3.0;
        }

        Some(Self { from, end, head })
    }
}
