//! Hit-testing against location markers.
//!
//! Markers are axis-aligned squares centered on their world position. A point
//! sitting exactly on an edge is outside; later-inserted markers win overlaps
//! because they are drawn on top.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Point;
use crate::doc::{Location, LocationId};
use crate::geometry::Rect;

/// The marker's hit box: `size` wide, centered on its position.
#[must_use]
pub fn marker_bounds(location: &Location, size: f64) -> Rect {
    Rect::centered(location.position(), size)
}

/// The topmost marker whose box strictly contains `world_pt`.
#[must_use]
pub fn hovered_marker(world_pt: Point, locations: &[&Location], size: f64) -> Option<LocationId> {
    locations
        .iter()
        .rev()
        .find(|loc| marker_bounds(loc, size).contains_strict(world_pt))
        .map(|loc| loc.id)
}

/// Ids of markers whose position lies strictly inside `rect`, in insertion order.
#[must_use]
pub fn markers_in_rect(rect: &Rect, locations: &[&Location]) -> Vec<LocationId> {
    locations
        .iter()
        .filter(|loc| rect.contains_strict(loc.position()))
        .map(|loc| loc.id)
        .collect()
}
