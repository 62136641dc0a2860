#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;
use crate::doc::MapData;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn setup() -> (DocStore, Uuid) {
    let mut doc = DocStore::new();
    let map = Uuid::new_v4();
    doc.new_map(MapData::new(map, "Overworld", ""));
    (doc, map)
}

fn place(doc: &mut DocStore, x: f64, y: f64) -> LocationId {
    let id = Uuid::new_v4();
    doc.create(id, x, y).unwrap();
    id
}

fn pointer_at(x: f64, y: f64) -> MouseState {
    let mut mouse = MouseState::default();
    mouse.on_move(pt(x, y), Point::default(), |p| p);
    mouse
}

fn glyph(scene: &Scene, id: LocationId) -> &Glyph {
    scene.glyphs.iter().find(|g| g.id == id).unwrap()
}

// =============================================================
// Pointer and selection rect
// =============================================================

#[test]
fn empty_store_plans_nothing() {
    let scene = plan(&DocStore::new(), &pointer_at(1.0, 1.0), &GestureState::default(), &InteractionConfig::default());
    assert_eq!(scene, Scene::default());
}

#[test]
fn pointer_dot_is_rounded() {
    let (doc, _) = setup();
    let scene = plan(&doc, &pointer_at(10.4, 10.6), &GestureState::default(), &InteractionConfig::default());
    assert_eq!(scene.pointer_dot, Some(pt(10.0, 11.0)));
    assert!(scene.selection_rect.is_none());
}

#[test]
fn no_pointer_no_dot() {
    let (doc, _) = setup();
    let scene = plan(&doc, &MouseState::default(), &GestureState::default(), &InteractionConfig::default());
    assert!(scene.pointer_dot.is_none());
}

#[test]
fn selection_rect_while_left_held() {
    let (doc, _) = setup();
    let mut mouse = pointer_at(50.0, 10.0);
    mouse.on_down(Button::Left, 0.0);
    mouse.on_move(pt(10.0, 40.0), Point::default(), |p| p);
    let scene = plan(&doc, &mouse, &GestureState::default(), &InteractionConfig::default());
    assert_eq!(scene.selection_rect, Some(Rect::spanning(pt(10.0, 10.0), pt(50.0, 40.0))));
}

#[test]
fn no_selection_rect_while_dragging() {
    let (doc, _) = setup();
    let mut mouse = pointer_at(50.0, 10.0);
    mouse.on_down(Button::Left, 0.0);
    let gesture = GestureState { dragging: true, started_drag_on_marker: true, hover: None };
    let scene = plan(&doc, &mouse, &gesture, &InteractionConfig::default());
    assert!(scene.selection_rect.is_none());
}

// =============================================================
// Glyphs
// =============================================================

#[test]
fn glyph_state_precedence() {
    let (mut doc, _) = setup();
    let active = place(&mut doc, 0.0, 0.0);
    let hovered = place(&mut doc, 20.0, 0.0);
    let selected = place(&mut doc, 40.0, 0.0);
    let plain = place(&mut doc, 60.0, 0.0);
    doc.set_active(Some(active)).unwrap();
    doc.set_selected(Some(vec![active, hovered, selected]));

    let gesture = GestureState { hover: Some(hovered), ..GestureState::default() };
    let scene = plan(&doc, &MouseState::default(), &gesture, &InteractionConfig::default());

    assert_eq!(glyph(&scene, active).state, GlyphState::Active);
    assert_eq!(glyph(&scene, hovered).state, GlyphState::Hovered);
    assert_eq!(glyph(&scene, selected).state, GlyphState::Selected);
    assert_eq!(glyph(&scene, plain).state, GlyphState::Default);

    assert_eq!(glyph(&scene, active).outline(), "#fff");
    assert_eq!(glyph(&scene, hovered).outline(), "#fff");
    assert_eq!(glyph(&scene, plain).outline(), "#333");
}

#[test]
fn glyph_fill_colors() {
    assert_eq!(GlyphState::Active.fill(), "#00ff33");
    assert_eq!(GlyphState::Hovered.fill(), "white");
    assert_eq!(GlyphState::Selected.fill(), "yellow");
    assert_eq!(GlyphState::Default.fill(), "red");
}

#[test]
fn glyphs_are_centered_squares_in_insertion_order() {
    let (mut doc, _) = setup();
    let a = place(&mut doc, 100.0, 100.0);
    let b = place(&mut doc, 10.0, 10.0);
    let scene = plan(&doc, &MouseState::default(), &GestureState::default(), &InteractionConfig::default());
    let ids: Vec<_> = scene.glyphs.iter().map(|g| g.id).collect();
    assert_eq!(ids, vec![a, b]);
    assert_eq!(glyph(&scene, a).bounds, Rect::centered(pt(100.0, 100.0), 8.0));
}

#[test]
fn dragged_glyph_follows_rounded_pointer() {
    let (mut doc, _) = setup();
    let a = place(&mut doc, 0.0, 0.0);
    doc.set_active(Some(a)).unwrap();
    let gesture = GestureState { dragging: true, started_drag_on_marker: true, hover: None };
    let scene = plan(&doc, &pointer_at(30.6, 40.2), &gesture, &InteractionConfig::default());
    assert_eq!(glyph(&scene, a).bounds, Rect::centered(pt(31.0, 40.0), 8.0));
}

#[test]
fn other_maps_are_not_drawn() {
    let (mut doc, _) = setup();
    place(&mut doc, 0.0, 0.0);
    doc.new_map(MapData::new(Uuid::new_v4(), "Second", ""));
    let scene = plan(&doc, &MouseState::default(), &GestureState::default(), &InteractionConfig::default());
    assert!(scene.glyphs.is_empty());
}

// =============================================================
// Edges and stubs
// =============================================================

#[test]
fn edge_runs_parent_to_child() {
    let (mut doc, _) = setup();
    let parent = place(&mut doc, 0.0, 0.0);
    let child = place(&mut doc, 100.0, 0.0);
    doc.set_parent(child, Some(parent)).unwrap();

    let scene = plan(&doc, &MouseState::default(), &GestureState::default(), &InteractionConfig::default());
    assert_eq!(scene.edges.len(), 1);
    let edge = &scene.edges[0];
    assert_eq!((edge.parent, edge.child), (parent, child));
    assert_eq!(edge.arrow.from, pt(0.0, 0.0));
    // Pulled back head radius / 2 + marker size + gap.
    assert!((edge.arrow.end.x - 88.0).abs() < 1e-9);
    assert!(!edge.highlighted);
    assert_eq!(edge.color(), "rgba(255, 255, 255, 0.25)");
}

#[test]
fn edge_highlighted_when_either_end_active() {
    let (mut doc, _) = setup();
    let parent = place(&mut doc, 0.0, 0.0);
    let child = place(&mut doc, 100.0, 0.0);
    doc.set_parent(child, Some(parent)).unwrap();

    for focus in [parent, child] {
        doc.set_active(Some(focus)).unwrap();
        let scene = plan(&doc, &MouseState::default(), &GestureState::default(), &InteractionConfig::default());
        assert!(scene.edges[0].highlighted);
        assert_eq!(scene.edges[0].color(), "white");
    }
}

#[test]
fn dragged_endpoint_uses_live_pointer() {
    let (mut doc, _) = setup();
    let parent = place(&mut doc, 0.0, 0.0);
    let child = place(&mut doc, 100.0, 0.0);
    doc.set_parent(child, Some(parent)).unwrap();
    doc.set_active(Some(parent)).unwrap();

    let gesture = GestureState { dragging: true, started_drag_on_marker: true, hover: None };
    let scene = plan(&doc, &pointer_at(0.5, 50.5), &gesture, &InteractionConfig::default());
    assert_eq!(scene.edges[0].arrow.from, pt(0.5, 50.5));
}

#[test]
fn coincident_markers_draw_no_edge() {
    let (mut doc, _) = setup();
    let parent = place(&mut doc, 5.0, 5.0);
    let child = place(&mut doc, 5.0, 5.0);
    doc.set_parent(child, Some(parent)).unwrap();
    let scene = plan(&doc, &MouseState::default(), &GestureState::default(), &InteractionConfig::default());
    assert!(scene.edges.is_empty());
    assert_eq!(scene.glyphs.len(), 2);
}

#[test]
fn cross_map_parent_draws_labeled_stub() {
    let (mut doc, first) = setup();
    let parent = place(&mut doc, 0.0, 0.0);
    let second = Uuid::new_v4();
    doc.new_map(MapData::new(second, "Cave", ""));
    let child = place(&mut doc, 100.0, 100.0);
    doc.set_parent(child, Some(parent)).unwrap();
    assert_eq!(doc.current_map_id(), Some(second));

    let scene = plan(&doc, &MouseState::default(), &GestureState::default(), &InteractionConfig::default());
    assert!(scene.edges.is_empty());
    assert_eq!(scene.stubs.len(), 1);
    let stub = &scene.stubs[0];
    assert_eq!(stub.child, child);
    assert_eq!(stub.label, "Overworld");
    assert_eq!(stub.arrow.from, pt(76.0, 76.0));

    // From the parent's map, the child is simply not drawn.
    doc.select_map(&first);
    let scene = plan(&doc, &MouseState::default(), &GestureState::default(), &InteractionConfig::default());
    assert!(scene.stubs.is_empty());
    assert!(scene.edges.is_empty());
}
