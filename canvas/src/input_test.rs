#![allow(clippy::float_cmp)]

use super::*;

fn identity(p: Point) -> Point {
    p
}

// =============================================================
// TrackedKey / Button mapping
// =============================================================

#[test]
fn key_names_match_case_insensitively() {
    assert_eq!(TrackedKey::from_key_name("Shift"), Some(TrackedKey::Shift));
    assert_eq!(TrackedKey::from_key_name("SHIFT"), Some(TrackedKey::Shift));
    assert_eq!(TrackedKey::from_key_name("Delete"), Some(TrackedKey::Delete));
    assert_eq!(TrackedKey::from_key_name("Backspace"), None);
    assert_eq!(TrackedKey::from_key_name("a"), None);
}

#[test]
fn dom_button_codes_map_to_buttons() {
    assert_eq!(Button::from_dom(0), Some(Button::Left));
    assert_eq!(Button::from_dom(1), Some(Button::Middle));
    assert_eq!(Button::from_dom(2), Some(Button::Right));
    assert_eq!(Button::from_dom(3), None);
    assert_eq!(Button::from_dom(-1), None);
}

// =============================================================
// Keyboard
// =============================================================

#[test]
fn keyboard_starts_released() {
    let kb = KeyboardState::default();
    for key in TrackedKey::ALL {
        assert_eq!(*kb.key(key), KeyState::default());
    }
}

#[test]
fn key_down_sets_pressed_and_just_pressed() {
    let mut kb = KeyboardState::default();
    assert!(kb.on_key_down("Shift", false, 1_000.0));
    let shift = kb.key(TrackedKey::Shift);
    assert!(shift.pressed);
    assert!(shift.just_pressed);
    assert!(!shift.just_released);
    assert_eq!(shift.hold_start, 1_000.0);
    assert!(!kb.key(TrackedKey::Delete).pressed);
}

#[test]
fn key_up_sets_just_released() {
    let mut kb = KeyboardState::default();
    kb.on_key_down("Delete", false, 10.0);
    assert!(kb.on_key_up("Delete", false));
    let del = kb.key(TrackedKey::Delete);
    assert!(!del.pressed);
    assert!(!del.just_pressed);
    assert!(del.just_released);
}

#[test]
fn repeat_events_are_ignored() {
    let mut kb = KeyboardState::default();
    kb.on_key_down("Shift", false, 10.0);
    kb.advance();
    assert!(!kb.on_key_down("Shift", true, 500.0));
    let shift = kb.key(TrackedKey::Shift);
    assert!(!shift.just_pressed);
    assert_eq!(shift.hold_start, 10.0);
    assert!(!kb.on_key_up("Shift", true));
    assert!(kb.key(TrackedKey::Shift).pressed);
}

#[test]
fn untracked_keys_are_ignored() {
    let mut kb = KeyboardState::default();
    assert!(!kb.on_key_down("Escape", false, 0.0));
    assert!(!kb.on_key_up("Escape", false));
    assert_eq!(kb, KeyboardState::default());
}

#[test]
fn advance_clears_only_just_flags() {
    let mut kb = KeyboardState::default();
    kb.on_key_down("Shift", false, 42.0);
    kb.advance();
    let shift = kb.key(TrackedKey::Shift);
    assert!(shift.pressed);
    assert!(!shift.just_pressed);
    assert_eq!(shift.hold_start, 42.0);

    kb.on_key_up("Shift", false);
    kb.advance();
    assert!(!kb.key(TrackedKey::Shift).just_released);
}

#[test]
fn held_for_measures_from_press() {
    let mut kb = KeyboardState::default();
    kb.on_key_down("Delete", false, 100.0);
    assert_eq!(kb.key(TrackedKey::Delete).held_for(420.0), 320.0);
}

// =============================================================
// Mouse
// =============================================================

#[test]
fn move_records_world_screen_and_movement() {
    let mut mouse = MouseState::default();
    mouse.on_move(Point::new(40.0, 20.0), Point::new(2.0, -1.0), |p| Point::new(p.x / 2.0, p.y / 2.0));
    assert_eq!(mouse.position, Some(Point::new(20.0, 10.0)));
    assert_eq!(mouse.screen_position, Some(Point::new(40.0, 20.0)));
    assert_eq!(mouse.movement, Some(Point::new(2.0, -1.0)));
}

#[test]
fn movement_accumulates_within_a_frame() {
    let mut mouse = MouseState::default();
    mouse.on_move(Point::new(1.0, 1.0), Point::new(3.0, 1.0), identity);
    mouse.on_move(Point::new(2.0, 2.0), Point::new(-1.0, 4.0), identity);
    assert_eq!(mouse.movement, Some(Point::new(2.0, 5.0)));
}

#[test]
fn down_snapshots_press_origin() {
    let mut mouse = MouseState::default();
    mouse.on_move(Point::new(10.0, 10.0), Point::default(), identity);
    mouse.on_down(Button::Left, 5.0);
    mouse.on_move(Point::new(90.0, 90.0), Point::new(80.0, 80.0), identity);

    let left = mouse.button(Button::Left);
    assert!(left.pressed());
    assert!(left.just_pressed());
    assert_eq!(left.key.hold_start, 5.0);
    assert_eq!(left.start_click_pos, Some(Point::new(10.0, 10.0)));
}

#[test]
fn down_off_canvas_has_no_origin() {
    let mut mouse = MouseState::default();
    mouse.on_down(Button::Right, 0.0);
    assert_eq!(mouse.button(Button::Right).start_click_pos, None);
}

#[test]
fn up_clears_pressed_and_sets_just_released() {
    let mut mouse = MouseState::default();
    mouse.on_down(Button::Middle, 0.0);
    mouse.on_up(Button::Middle);
    let middle = mouse.button(Button::Middle);
    assert!(!middle.pressed());
    assert!(!middle.just_pressed());
    assert!(middle.just_released());
}

#[test]
fn press_and_release_in_one_frame_still_went_down() {
    let mut mouse = MouseState::default();
    mouse.on_down(Button::Left, 0.0);
    mouse.on_up(Button::Left);
    let left = mouse.button(Button::Left);
    assert!(!left.just_pressed());
    assert!(left.just_released());
    assert!(left.went_down());

    mouse.advance();
    assert!(!mouse.button(Button::Left).went_down());
}

#[test]
fn buttons_are_independent() {
    let mut mouse = MouseState::default();
    mouse.on_down(Button::Left, 0.0);
    assert!(!mouse.button(Button::Right).pressed());
    assert!(!mouse.button(Button::Middle).pressed());
}

#[test]
fn wheel_accumulates_and_ignores_nan() {
    let mut mouse = MouseState::default();
    mouse.on_wheel(100.0);
    mouse.on_wheel(-30.0);
    mouse.on_wheel(f64::NAN);
    assert_eq!(mouse.wheel_movement, Some(70.0));
}

#[test]
fn leave_clears_positions_but_not_buttons() {
    let mut mouse = MouseState::default();
    mouse.on_move(Point::new(5.0, 5.0), Point::default(), identity);
    mouse.on_down(Button::Left, 0.0);
    mouse.on_leave();
    assert!(mouse.position.is_none());
    assert!(mouse.screen_position.is_none());
    assert!(mouse.button(Button::Left).pressed());
}

#[test]
fn advance_clears_frame_scoped_state() {
    let mut mouse = MouseState::default();
    mouse.on_move(Point::new(5.0, 5.0), Point::new(1.0, 1.0), identity);
    mouse.on_down(Button::Left, 7.0);
    mouse.on_wheel(12.0);
    mouse.advance();

    assert!(mouse.movement.is_none());
    assert!(mouse.wheel_movement.is_none());
    let left = mouse.button(Button::Left);
    assert!(left.pressed());
    assert!(!left.just_pressed());
    assert_eq!(left.key.hold_start, 7.0);
    assert_eq!(left.start_click_pos, Some(Point::new(5.0, 5.0)));
    assert_eq!(mouse.position, Some(Point::new(5.0, 5.0)));
}

#[test]
fn just_flags_are_visible_for_exactly_one_frame() {
    let mut input = InputState::default();
    input.mouse.on_down(Button::Left, 0.0);
    input.keyboard.on_key_down("Delete", false, 0.0);
    assert!(input.mouse.button(Button::Left).just_pressed());
    assert!(input.keyboard.key(TrackedKey::Delete).just_pressed);

    input.advance();
    assert!(!input.mouse.button(Button::Left).just_pressed());
    assert!(!input.keyboard.key(TrackedKey::Delete).just_pressed);
    assert!(input.mouse.button(Button::Left).pressed());
}
