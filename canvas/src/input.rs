//! Input model: tracked keys, mouse buttons, and the per-frame input state.
//!
//! DOM events are folded into [`InputState`] as they arrive. The controller
//! reads the state once per frame, after which [`InputState::advance`] clears
//! the frame-scoped parts: `just_pressed` / `just_released` flags, pointer
//! movement, and wheel movement. `advance` is bookkeeping only; it never marks
//! the engine dirty, so it cannot schedule another frame by itself.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;

/// A keyboard key the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackedKey {
    /// Chains a newly created marker to the active one.
    Shift,
    /// Removes every selected marker.
    Delete,
}

impl TrackedKey {
    pub const ALL: [Self; 2] = [Self::Shift, Self::Delete];

    /// Map a browser `KeyboardEvent.key` value to a tracked key, ignoring case.
    #[must_use]
    pub fn from_key_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("shift") {
            Some(Self::Shift)
        } else if name.eq_ignore_ascii_case("delete") {
            Some(Self::Delete)
        } else {
            None
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Shift => 0,
            Self::Delete => 1,
        }
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Left,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Right,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code. Back/forward buttons are ignored.
    #[must_use]
    pub fn from_dom(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::Left),
            1 => Some(Self::Middle),
            2 => Some(Self::Right),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Middle => 1,
            Self::Right => 2,
        }
    }
}

/// Press lifecycle of one key.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KeyState {
    pub pressed: bool,
    pub just_pressed: bool,
    pub just_released: bool,
    /// A press landed this frame, even if a release followed it.
    pub pressed_in_frame: bool,
    /// Timestamp (ms) of the last press.
    pub hold_start: f64,
}

impl KeyState {
    fn press(&mut self, now_ms: f64) {
        self.pressed = true;
        self.just_pressed = true;
        self.just_released = false;
        self.pressed_in_frame = true;
        self.hold_start = now_ms;
    }

    fn release(&mut self) {
        self.pressed = false;
        self.just_pressed = false;
        self.just_released = true;
    }

    fn advance(&mut self) {
        self.just_pressed = false;
        self.just_released = false;
        self.pressed_in_frame = false;
    }

    /// Milliseconds since the last press.
    #[must_use]
    pub fn held_for(&self, now_ms: f64) -> f64 {
        crate::geometry::duration(self.hold_start, now_ms)
    }
}

/// Press lifecycle of one mouse button, plus where the press began.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ButtonState {
    pub key: KeyState,
    /// World position of the pointer at press time. Drag distance is measured
    /// from here, not from the previous frame.
    pub start_click_pos: Option<Point>,
}

impl ButtonState {
    #[must_use]
    pub fn pressed(&self) -> bool {
        self.key.pressed
    }

    #[must_use]
    pub fn just_pressed(&self) -> bool {
        self.key.just_pressed
    }

    #[must_use]
    pub fn just_released(&self) -> bool {
        self.key.just_released
    }

    /// Went down this frame, whether or not it is still held.
    #[must_use]
    pub fn went_down(&self) -> bool {
        self.key.just_pressed || self.key.pressed_in_frame
    }

    #[must_use]
    pub fn held_for(&self, now_ms: f64) -> f64 {
        self.key.held_for(now_ms)
    }
}

/// Tracked keyboard keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyboardState {
    keys: [KeyState; 2],
}

impl KeyboardState {
    #[must_use]
    pub fn key(&self, key: TrackedKey) -> &KeyState {
        &self.keys[key.index()]
    }

    /// Handle a key-down. Auto-repeat and untracked keys are ignored.
    /// Returns whether the state changed.
    pub fn on_key_down(&mut self, name: &str, repeat: bool, now_ms: f64) -> bool {
        if repeat {
            return false;
        }
        let Some(key) = TrackedKey::from_key_name(name) else {
            return false;
        };
        self.keys[key.index()].press(now_ms);
        true
    }

    /// Handle a key-up. Auto-repeat and untracked keys are ignored.
    /// Returns whether the state changed.
    pub fn on_key_up(&mut self, name: &str, repeat: bool) -> bool {
        if repeat {
            return false;
        }
        let Some(key) = TrackedKey::from_key_name(name) else {
            return false;
        };
        self.keys[key.index()].release();
        true
    }

    /// Clear the one-frame flags; `pressed` and `hold_start` are kept.
    pub fn advance(&mut self) {
        for key in &mut self.keys {
            key.advance();
        }
    }
}

/// Pointer position, frame deltas, and button states.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MouseState {
    /// World position, or `None` while the pointer is off the canvas.
    pub position: Option<Point>,
    /// Screen position, or `None` while the pointer is off the canvas.
    pub screen_position: Option<Point>,
    /// Raw screen-pixel movement accumulated this frame.
    pub movement: Option<Point>,
    /// Wheel delta accumulated this frame (positive = scroll down).
    pub wheel_movement: Option<f64>,
    buttons: [ButtonState; 3],
}

impl MouseState {
    #[must_use]
    pub fn button(&self, button: Button) -> &ButtonState {
        &self.buttons[button.index()]
    }

    /// Record a pointer move. `to_world` converts the screen point with the
    /// camera current at event time.
    pub fn on_move(&mut self, screen: Point, movement: Point, to_world: impl FnOnce(Point) -> Point) {
        self.position = Some(to_world(screen));
        self.screen_position = Some(screen);
        let acc = self.movement.unwrap_or_default();
        self.movement = Some(Point::new(acc.x + movement.x, acc.y + movement.y));
    }

    /// Record a button press, snapshotting the press origin.
    pub fn on_down(&mut self, button: Button, now_ms: f64) {
        let origin = self.position;
        let state = &mut self.buttons[button.index()];
        state.key.press(now_ms);
        state.start_click_pos = origin;
    }

    /// Record a button release.
    pub fn on_up(&mut self, button: Button) {
        self.buttons[button.index()].key.release();
    }

    /// Record wheel movement for the current frame.
    pub fn on_wheel(&mut self, delta_y: f64) {
        if !delta_y.is_finite() {
            return;
        }
        self.wheel_movement = Some(self.wheel_movement.unwrap_or(0.0) + delta_y);
    }

    /// The pointer left the canvas: forget where it was.
    pub fn on_leave(&mut self) {
        self.position = None;
        self.screen_position = None;
    }

    /// Clear the one-frame flags and deltas.
    pub fn advance(&mut self) {
        for button in &mut self.buttons {
            button.key.advance();
        }
        self.movement = None;
        self.wheel_movement = None;
    }
}

/// Everything the controller reads about user input for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    pub keyboard: KeyboardState,
    pub mouse: MouseState,
}

impl InputState {
    /// End the frame. Must run exactly once, after the controller has read
    /// the state, or single-frame transitions are lost.
    pub fn advance(&mut self) {
        self.keyboard.advance();
        self.mouse.advance();
    }
}
