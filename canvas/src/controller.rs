//! Interaction controller: one frame of input in, intents and a camera out.
//!
//! The controller is a pure function over [`Frame`] plus the small amount of
//! gesture memory that spans frames ([`GestureState`]). It never writes the
//! document; every change it wants is returned as an [`Intent`] for the
//! engine to apply.
//!
//! Per frame, in order:
//!
//! 1. Zoom from accumulated wheel movement.
//! 2. Hover: topmost marker under the pointer.
//! 3. Drag engage, then drag commit on left release.
//! 4. Hovered branch (focus on press, delete on quick right-click) or
//!    empty-space branch (pan, clear focus, click-to-create, rectangle select).
//! 5. Delete key removes the selection.
//!
//! Nothing happens while the pointer is off the canvas, except that a left
//! release there abandons the drag.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use crate::camera::{Camera, Point};
use crate::config::InteractionConfig;
use crate::doc::{Intent, Location, LocationId};
use crate::geometry::{Rect, distance};
use crate::hit::{hovered_marker, markers_in_rect};
use crate::input::{Button, InputState, TrackedKey};

/// Gesture memory carried between frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GestureState {
    /// Marker under the pointer as of the last frame.
    pub hover: Option<LocationId>,
    /// The current left press began on a marker.
    pub started_drag_on_marker: bool,
    /// The active marker is following the pointer.
    pub dragging: bool,
}

/// Read-only view of everything a frame decision depends on.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub input: &'a InputState,
    pub camera: Camera,
    /// Current map's markers in insertion order.
    pub locations: &'a [&'a Location],
    pub active: Option<LocationId>,
    pub selected: &'a [LocationId],
    pub config: &'a InteractionConfig,
    pub now_ms: f64,
}

/// What one frame decided.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutcome {
    pub intents: Vec<Intent>,
    pub camera: Camera,
}

/// Run the controller for one frame.
///
/// `new_id` is called at most once, when a click places a marker.
pub fn update(
    gesture: &mut GestureState,
    frame: &Frame<'_>,
    mut new_id: impl FnMut() -> LocationId,
) -> FrameOutcome {
    let mut outcome = FrameOutcome { intents: Vec::new(), camera: frame.camera };
    let mouse = &frame.input.mouse;
    let left = mouse.button(Button::Left);
    let Some(pointer) = mouse.position else {
        // A release off the canvas still ends any gesture in progress.
        gesture.hover = None;
        if left.just_released() {
            gesture.dragging = false;
            gesture.started_drag_on_marker = false;
        }
        return outcome;
    };
    let config = frame.config;
    let right = mouse.button(Button::Right);
    let middle = mouse.button(Button::Middle);

    if let Some(wheel) = mouse.wheel_movement {
        let step = if wheel < 0.0 { config.zoom_step } else { -config.zoom_step };
        outcome.camera.zoom_by(step, config.min_zoom);
    }

    let hover = hovered_marker(pointer, frame.locations, config.marker_size);
    gesture.hover = hover;

    if left.pressed()
        && gesture.started_drag_on_marker
        && left.held_for(frame.now_ms) >= config.drag_threshold_ms
    {
        gesture.dragging = true;
    }

    // A hold that crossed the threshold still counts when the release lands
    // in the same frame as the last move.
    let mut committed_drag = false;
    let held_long =
        gesture.started_drag_on_marker && left.held_for(frame.now_ms) >= config.drag_threshold_ms;
    if left.just_released() && (gesture.dragging || held_long) {
        outcome.intents.push(Intent::MoveActive { x: pointer.x, y: pointer.y });
        gesture.dragging = false;
        committed_drag = true;
    }

    if let Some(hovered) = hover {
        if left.went_down() {
            outcome.intents.push(Intent::SetActive(Some(hovered)));
            gesture.started_drag_on_marker = true;
        }
        if right.just_released() && right.held_for(frame.now_ms) <= config.drag_threshold_ms {
            outcome.intents.push(Intent::Remove(hovered));
            outcome.intents.push(Intent::SetSelected(None));
        }
    } else {
        if let Some(movement) = mouse.movement
            && (right.pressed() || middle.pressed())
        {
            outcome.camera.pan_by(movement);
        }
        if right.just_released() && right.held_for(frame.now_ms) < config.drag_threshold_ms {
            outcome.intents.push(Intent::SetActive(None));
        }
        if left.just_released()
            && !committed_drag
            && let Some(origin) = left.start_click_pos
        {
            let travelled = distance(origin, pointer);
            if left.held_for(frame.now_ms) < config.drag_threshold_ms && travelled < config.drag_distance {
                place_marker(&mut outcome.intents, frame, pointer, new_id());
            } else if !gesture.started_drag_on_marker && travelled > config.drag_distance {
                let rect = Rect::spanning(origin, pointer);
                let ids = markers_in_rect(&rect, frame.locations);
                outcome.intents.push(Intent::SetSelected(Some(ids)));
            }
        }
    }

    if left.just_released() {
        gesture.started_drag_on_marker = false;
    }

    if frame.input.keyboard.key(TrackedKey::Delete).just_pressed {
        outcome
            .intents
            .extend(frame.selected.iter().map(|id| Intent::Remove(*id)));
    }

    outcome
}

/// Create a marker at the pointer, chaining it under the active marker while
/// Shift is held, and focus it.
fn place_marker(intents: &mut Vec<Intent>, frame: &Frame<'_>, pointer: Point, id: LocationId) {
    intents.push(Intent::Create { id, x: pointer.x, y: pointer.y });
    if frame.input.keyboard.key(TrackedKey::Shift).pressed
        && let Some(parent) = frame.active
    {
        intents.push(Intent::SetParent { id, parent: Some(parent) });
    }
    intents.push(Intent::SetActive(Some(id)));
}

/// Whether the marker at `id` should be drawn following the pointer.
#[must_use]
pub fn is_dragged(gesture: &GestureState, active: Option<LocationId>, id: &LocationId) -> bool {
    gesture.dragging && active.as_ref() == Some(id)
}
