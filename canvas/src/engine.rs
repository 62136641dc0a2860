use uuid::Uuid;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::camera::{Camera, Point};
use crate::config::InteractionConfig;
use crate::controller::{self, Frame, GestureState};
use crate::doc::{DocStore, Intent, LocationId, MapData, MapId};
use crate::image::{ImageSlot, ImageTicket};
use crate::input::{Button, InputState};
use crate::render;
use crate::scene::{self, Scene};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from a frame for the host to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The document changed; schedule a save.
    DocChanged,
    /// Start decoding `source` and report back with `ticket`.
    LoadImage { ticket: ImageTicket, source: String },
    /// Show or hide the "no image set" advisory.
    ImageAdvisory(bool),
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub doc: DocStore,
    pub camera: Camera,
    pub input: InputState,
    pub gesture: GestureState,
    pub config: InteractionConfig,
    dirty: bool,
    doc_changed: bool,
    advisory_shown: bool,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(InteractionConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            doc: DocStore::new(),
            camera: Camera::default(),
            input: InputState::default(),
            gesture: GestureState::default(),
            config,
            dirty: true,
            doc_changed: false,
            advisory_shown: false,
        }
    }

    /// Whether a frame should be scheduled.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    // --- Data inputs ---

    /// Replace the document (e.g. after loading a save). Gesture memory is
    /// dropped since it may reference markers that no longer exist.
    pub fn load(&mut self, doc: DocStore) {
        self.doc = doc;
        self.gesture = GestureState::default();
        self.dirty = true;
    }

    // --- Input events ---

    pub fn on_pointer_move(&mut self, screen: Point, movement: Point) {
        let camera = self.camera;
        self.input
            .mouse
            .on_move(screen, movement, |p| camera.screen_to_world(p));
        self.dirty = true;
    }

    pub fn on_pointer_down(&mut self, button: Button, now_ms: f64) {
        self.input.mouse.on_down(button, now_ms);
        self.dirty = true;
    }

    pub fn on_pointer_up(&mut self, button: Button) {
        self.input.mouse.on_up(button);
        self.dirty = true;
    }

    pub fn on_pointer_leave(&mut self) {
        self.input.mouse.on_leave();
        self.dirty = true;
    }

    pub fn on_wheel(&mut self, delta_y: f64) {
        self.input.mouse.on_wheel(delta_y);
        self.dirty = true;
    }

    pub fn on_key_down(&mut self, key: &str, repeat: bool, now_ms: f64) {
        if self.input.keyboard.on_key_down(key, repeat, now_ms) {
            self.dirty = true;
        }
    }

    pub fn on_key_up(&mut self, key: &str, repeat: bool) {
        if self.input.keyboard.on_key_up(key, repeat) {
            self.dirty = true;
        }
    }

    // --- Map operations ---

    pub fn new_map(&mut self, id: MapId, name: &str, image: &str) {
        self.doc.new_map(MapData::new(id, name, image));
        self.touch(true);
    }

    /// # Errors
    ///
    /// Propagates [`crate::doc::DocError::UnknownMap`].
    pub fn update_map(&mut self, id: MapId, name: &str, image: &str) -> Result<(), crate::doc::DocError> {
        self.doc.update_map(id, name, image)?;
        self.touch(true);
        Ok(())
    }

    pub fn delete_map(&mut self, id: &MapId) {
        let changed = self.doc.delete_map(id);
        self.touch(changed);
    }

    pub fn select_map(&mut self, id: &MapId) {
        let changed = self.doc.select_map(id);
        self.touch(changed);
    }

    pub fn set_bg_color(&mut self, color: &str) {
        let changed = self.doc.set_bg_color(color);
        self.touch(changed);
    }

    pub fn rename_active(&mut self, name: &str) {
        let changed = self.doc.rename_active(name);
        self.touch(changed);
    }

    // --- Location operations ---

    /// Focus a location (switching to its map) or clear focus with `None`.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::doc::DocError::UnknownLocation`].
    pub fn set_active(&mut self, id: Option<LocationId>) -> Result<(), crate::doc::DocError> {
        self.apply(&Intent::SetActive(id))
    }

    /// Move the active location. Non-finite positions are dropped.
    pub fn set_active_position(&mut self, x: f64, y: f64) {
        // MoveActive never fails.
        let _ = self.apply(&Intent::MoveActive { x, y });
    }

    /// Set or clear a location's parent, which may live on another map.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::doc::DocError::UnknownLocation`] and
    /// [`crate::doc::DocError::ParentCycle`].
    pub fn set_parent(&mut self, id: LocationId, parent: Option<LocationId>) -> Result<(), crate::doc::DocError> {
        self.apply(&Intent::SetParent { id, parent })
    }

    fn apply(&mut self, intent: &Intent) -> Result<(), crate::doc::DocError> {
        let changed = self.doc.apply(intent)?;
        self.touch(changed);
        Ok(())
    }

    fn touch(&mut self, changed: bool) {
        if changed {
            self.doc_changed = true;
            self.dirty = true;
        }
    }

    // --- Frame ---

    /// Run one frame: controller, intent application, input advance.
    ///
    /// A clean engine returns no actions and changes nothing.
    pub fn frame(&mut self, now_ms: f64) -> Vec<Action> {
        self.frame_with_ids(now_ms, Uuid::new_v4)
    }

    /// [`Self::frame`] with an injected id source for new markers.
    pub fn frame_with_ids(&mut self, now_ms: f64, new_id: impl FnMut() -> LocationId) -> Vec<Action> {
        if !self.dirty {
            return Vec::new();
        }
        self.dirty = false;

        let outcome = {
            let locations = self.doc.visible_locations();
            let frame = Frame {
                input: &self.input,
                camera: self.camera,
                locations: &locations,
                active: self.doc.active_location_id(),
                selected: self.doc.selected_ids(),
                config: &self.config,
                now_ms,
            };
            controller::update(&mut self.gesture, &frame, new_id)
        };
        self.camera = outcome.camera;

        for intent in &outcome.intents {
            match self.doc.apply(intent) {
                Ok(true) => self.doc_changed = true,
                Ok(false) => {}
                Err(e) => log::debug!("ignoring {intent:?}: {e}"),
            }
        }
        self.input.advance();

        let mut actions = Vec::new();
        if std::mem::take(&mut self.doc_changed) {
            actions.push(Action::DocChanged);
        }
        let missing_image = self.doc.current_map().is_some_and(|m| !m.has_image());
        if missing_image != self.advisory_shown {
            self.advisory_shown = missing_image;
            actions.push(Action::ImageAdvisory(missing_image));
        }
        actions
    }

    /// What to draw for the current state.
    #[must_use]
    pub fn scene(&self) -> Scene {
        scene::plan(&self.doc, &self.input.mouse, &self.gesture, &self.config)
    }

    // --- Queries ---

    /// Image source of the current map; empty when there is none.
    #[must_use]
    pub fn image_source(&self) -> &str {
        self.doc.current_map().map_or("", |m| m.image.as_str())
    }

    /// The current camera state.
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    /// Background color of the current map.
    #[must_use]
    pub fn bg_color(&self) -> Option<&str> {
        self.doc.current_map().and_then(|m| m.bg_color.as_deref())
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    image: ImageSlot<HtmlImageElement>,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the element has no 2D context.
    pub fn new(canvas: HtmlCanvasElement, config: InteractionConfig) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx, image: ImageSlot::new(), core: EngineCore::new(config) })
    }

    /// Run a frame and point the image slot at the current map's image.
    /// Returns no actions if nothing was dirty; call [`Self::render`] afterwards.
    pub fn frame(&mut self, now_ms: f64) -> Vec<Action> {
        if !self.core.is_dirty() {
            return Vec::new();
        }
        let mut actions = self.core.frame(now_ms);
        if let Some(ticket) = self.image.request(self.core.image_source()) {
            actions.push(Action::LoadImage { ticket, source: self.image.source().to_owned() });
        }
        actions
    }

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any `Canvas2D` call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let scene = self.core.scene();
        render::draw(&self.canvas, &self.ctx, self.image.image(), &self.core.camera, &scene)
    }

    /// A decode finished. Stale tickets are ignored; a fresh image resets the camera.
    pub fn commit_image(&mut self, ticket: ImageTicket, image: HtmlImageElement) {
        if self.image.commit(ticket, image) {
            self.core.camera.reset();
            self.core.mark_dirty();
        }
    }

    pub fn fail_image(&mut self, ticket: ImageTicket) {
        self.image.fail(ticket);
    }

    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}
