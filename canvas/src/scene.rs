//! Scene planning: decide what to draw without touching a canvas.
//!
//! [`plan`] turns the document, pointer and gesture state into a flat
//! [`Scene`]. The renderer walks it in field order (pointer dot, selection
//! rectangle, edges, stubs, glyphs) so later items paint over earlier ones.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use crate::camera::Point;
use crate::config::InteractionConfig;
use crate::consts::{ARROW_HEAD_RADIUS, ARROW_TRAIL_GAP, EDGE_COLOR, EDGE_DIM_COLOR, STUB_OFFSET};
use crate::controller::{GestureState, is_dragged};
use crate::doc::{DocStore, Location, LocationId};
use crate::geometry::{Arrow, Rect, rounded};
use crate::input::{Button, MouseState};

/// Label used when a stub's parent map cannot be found.
pub const UNKNOWN_MAP_LABEL: &str = "?";

/// Visual state of a marker glyph, highest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphState {
    Active,
    Hovered,
    Selected,
    Default,
}

impl GlyphState {
    #[must_use]
    pub fn fill(self) -> &'static str {
        match self {
            Self::Active => "#00ff33",
            Self::Hovered => "white",
            Self::Selected => "yellow",
            Self::Default => "red",
        }
    }
}

/// One marker square.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub id: LocationId,
    pub bounds: Rect,
    pub state: GlyphState,
    /// Selected markers get a bright outline whatever their fill.
    pub selected: bool,
}

impl Glyph {
    #[must_use]
    pub fn outline(&self) -> &'static str {
        if self.selected { "#fff" } else { "#333" }
    }
}

/// A parent-to-child arrow between two markers on the current map.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub parent: LocationId,
    pub child: LocationId,
    pub arrow: Arrow,
    /// One end is the active marker.
    pub highlighted: bool,
}

impl Edge {
    #[must_use]
    pub fn color(&self) -> &'static str {
        edge_color(self.highlighted)
    }
}

/// A short arrow into a marker whose parent lives on another map.
#[derive(Debug, Clone, PartialEq)]
pub struct Stub {
    pub child: LocationId,
    pub arrow: Arrow,
    /// Name of the parent's map, drawn at the arrow's tail.
    pub label: String,
    pub highlighted: bool,
}

impl Stub {
    #[must_use]
    pub fn color(&self) -> &'static str {
        edge_color(self.highlighted)
    }
}

fn edge_color(highlighted: bool) -> &'static str {
    if highlighted { EDGE_COLOR } else { EDGE_DIM_COLOR }
}

/// Everything to draw for one frame, in world coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub pointer_dot: Option<Point>,
    pub selection_rect: Option<Rect>,
    pub edges: Vec<Edge>,
    pub stubs: Vec<Stub>,
    pub glyphs: Vec<Glyph>,
}

/// Plan the current map's scene.
#[must_use]
pub fn plan(doc: &DocStore, mouse: &MouseState, gesture: &GestureState, config: &InteractionConfig) -> Scene {
    let Some(map) = doc.current_map() else {
        return Scene::default();
    };
    let visible = doc.visible_locations();
    let active = map.active_location;
    let pointer = mouse.position;
    let left = mouse.button(Button::Left);

    let mut scene = Scene {
        pointer_dot: pointer.map(rounded),
        ..Scene::default()
    };

    if let Some(pointer) = pointer
        && !gesture.dragging
        && left.pressed()
        && let Some(origin) = left.start_click_pos
    {
        scene.selection_rect = Some(Rect::spanning(origin, pointer));
    }

    // Endpoint of an edge: the live pointer while that marker is dragged.
    let anchor = |loc: &Location| match pointer {
        Some(p) if is_dragged(gesture, active, &loc.id) => p,
        _ => loc.position(),
    };
    let trail = config.marker_size + ARROW_TRAIL_GAP;

    for child in &visible {
        let Some(parent_id) = child.parent_id else {
            continue;
        };
        let highlighted = active == Some(child.id) || active == Some(parent_id);
        let Some(parent) = doc.location(&parent_id) else {
            continue;
        };

        if parent.map == map.id {
            if let Some(arrow) = Arrow::new(anchor(parent), anchor(*child), ARROW_HEAD_RADIUS, trail) {
                scene.edges.push(Edge { parent: parent.id, child: child.id, arrow, highlighted });
            }
        } else {
            let to = anchor(*child);
            let from = Point::new(to.x - STUB_OFFSET, to.y - STUB_OFFSET);
            if let Some(arrow) = Arrow::new(from, to, ARROW_HEAD_RADIUS, trail) {
                let label = doc
                    .map(&parent.map)
                    .map_or_else(|| UNKNOWN_MAP_LABEL.to_owned(), |m| m.name.clone());
                scene.stubs.push(Stub { child: child.id, arrow, label, highlighted });
            }
        }
    }

    for loc in &visible {
        let selected = map.is_selected(&loc.id);
        let state = if active == Some(loc.id) {
            GlyphState::Active
        } else if gesture.hover == Some(loc.id) {
            GlyphState::Hovered
        } else if selected {
            GlyphState::Selected
        } else {
            GlyphState::Default
        };
        let center = match pointer {
            Some(p) if is_dragged(gesture, active, &loc.id) => rounded(p),
            _ => loc.position(),
        };
        scene.glyphs.push(Glyph {
            id: loc.id,
            bounds: Rect::centered(center, config.marker_size),
            state,
            selected,
        });
    }

    scene
}
