//! Browser host: wires DOM events, animation frames, image decoding, and
//! debounced saving around `canvas::engine::Engine`.
//!
//! The page constructs one [`EditorHandle`] per canvas. Every DOM event
//! updates the engine core and requests an animation frame; the frame runs
//! the engine and processes its [`Action`]s. Event closures hold weak
//! references to the shared state, so dropping the handle detaches
//! everything.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use canvas::camera::Point;
use canvas::engine::{Action, Engine, EngineCore};
use canvas::image::ImageTicket;
use canvas::input::Button;
use gloo_timers::callback::Timeout;
use js_sys::{Date, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::{JsCast, closure::Closure};
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{Event, EventTarget, HtmlCanvasElement, HtmlElement, HtmlImageElement, KeyboardEvent, MouseEvent, WheelEvent};

use crate::changelog::{CHANGELOG, ChangelogState};
use crate::config::AppConfig;
use crate::export::{EmoTrackerExporter, Exporter};
use crate::persistence::{PersistenceError, SaveData, SnapshotStorage, load_or_default, save_snapshot};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        web_sys::console::warn_1(&JsValue::from_str(&format!("logger init failed: {e}")));
    }
}

/// `window.localStorage` as a snapshot backend.
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// # Errors
    ///
    /// Returns [`PersistenceError::Storage`] when there is no window or
    /// storage is disabled.
    pub fn open() -> Result<Self, PersistenceError> {
        let window = web_sys::window().ok_or_else(|| PersistenceError::Storage("no window".to_owned()))?;
        let storage = window
            .local_storage()
            .map_err(storage_error)?
            .ok_or_else(|| PersistenceError::Storage("localStorage disabled".to_owned()))?;
        Ok(Self { storage })
    }
}

impl SnapshotStorage for LocalStorage {
    fn load(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        self.storage.get_item(key).map_err(storage_error)
    }

    fn store(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.storage.set_item(key, value).map_err(storage_error)
    }
}

fn storage_error(e: JsValue) -> PersistenceError {
    match Reflect::get(&e, &JsValue::from_str("name")) {
        Ok(name) if name.as_string().as_deref() == Some("QuotaExceededError") => PersistenceError::QuotaExceeded,
        _ => PersistenceError::Storage(format!("{e:?}")),
    }
}

/// Free bytes reported by `navigator.storage.estimate()`, if available.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
async fn remaining_quota() -> Option<u64> {
    let window = web_sys::window()?;
    let promise = window.navigator().storage().estimate().ok()?;
    let estimate = JsFuture::from(promise).await.ok()?;
    let quota = Reflect::get(&estimate, &JsValue::from_str("quota")).ok()?.as_f64()?;
    let usage = Reflect::get(&estimate, &JsValue::from_str("usage")).ok()?.as_f64()?;
    Some((quota - usage).max(0.0) as u64)
}

/// An event listener that detaches itself on drop.
struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn new(target: &EventTarget, event: &'static str, handler: impl FnMut(Event) + 'static) -> Result<Self, JsValue> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self { target: target.clone(), event, callback })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(e) = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref())
        {
            log::warn!("failed to detach {} listener: {e:?}", self.event);
        }
    }
}

/// An in-flight decode. Replacing it detaches the old handlers so a late
/// load cannot fire into the engine.
struct PendingImage {
    element: HtmlImageElement,
    _onload: Closure<dyn FnMut()>,
    _onerror: Closure<dyn FnMut()>,
}

impl Drop for PendingImage {
    fn drop(&mut self) {
        self.element.set_onload(None);
        self.element.set_onerror(None);
    }
}

struct Host {
    engine: Engine,
    storage: Option<LocalStorage>,
    config: AppConfig,
    changelog: ChangelogState,
    advisory: Option<HtmlElement>,
    /// Dropping the previous timeout cancels it.
    save_timer: Option<Timeout>,
    frame_pending: bool,
    pending_image: Option<PendingImage>,
}

type Shared = Rc<RefCell<Host>>;

fn request_frame(shared: &Shared) {
    {
        let mut host = shared.borrow_mut();
        if host.frame_pending || !host.engine.core.is_dirty() {
            return;
        }
        host.frame_pending = true;
    }

    let Some(window) = web_sys::window() else {
        run_frame(shared);
        return;
    };

    let weak = Rc::downgrade(shared);
    let holder: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let holder_for_cb = Rc::clone(&holder);
    let cb = Closure::wrap(Box::new(move |_ts: f64| {
        if let Some(shared) = weak.upgrade() {
            run_frame(&shared);
        }
        holder_for_cb.borrow_mut().take();
    }) as Box<dyn FnMut(f64)>);

    if window.request_animation_frame(cb.as_ref().unchecked_ref()).is_ok() {
        *holder.borrow_mut() = Some(cb);
    } else {
        run_frame(shared);
    }
}

fn run_frame(shared: &Shared) {
    let actions = {
        let mut host = shared.borrow_mut();
        host.frame_pending = false;
        let actions = host.engine.frame(Date::now());
        if let Err(e) = host.engine.render() {
            log::error!("render failed: {e:?}");
        }
        let color = host.engine.core.bg_color().unwrap_or_default();
        if let Err(e) = host.engine.canvas().style().set_property("background-color", color) {
            log::warn!("could not apply background color: {e:?}");
        }
        actions
    };
    for action in actions {
        handle_action(shared, action);
    }
}

fn handle_action(shared: &Shared, action: Action) {
    match action {
        Action::DocChanged => schedule_save(shared),
        Action::LoadImage { ticket, source } => load_image(shared, ticket, &source),
        Action::ImageAdvisory(show) => {
            if let Some(advisory) = &shared.borrow().advisory {
                advisory.set_hidden(!show);
            }
        }
    }
}

fn schedule_save(shared: &Shared) {
    let weak = Rc::downgrade(shared);
    let delay = shared.borrow().config.save_debounce_ms;
    let timer = Timeout::new(delay, move || {
        if let Some(shared) = weak.upgrade() {
            spawn_local(save_now(shared));
        }
    });
    shared.borrow_mut().save_timer = Some(timer);
}

async fn save_now(shared: Shared) {
    let remaining = remaining_quota().await;
    let mut host = shared.borrow_mut();
    let host = &mut *host;
    let Some(storage) = host.storage.as_mut() else {
        return;
    };
    let data = SaveData::from_store(&host.engine.core.doc, Some(host.changelog.checksum.clone()));
    if let Err(e) = save_snapshot(storage, &host.config.save_key, &data, remaining, host.config.strip_images_on_quota) {
        log::error!("save failed: {e}");
    }
}

fn load_image(shared: &Shared, ticket: ImageTicket, source: &str) {
    let element = match HtmlImageElement::new() {
        Ok(element) => element,
        Err(e) => {
            log::error!("could not create image element: {e:?}");
            shared.borrow_mut().engine.fail_image(ticket);
            return;
        }
    };

    let weak = Rc::downgrade(shared);
    let loaded = element.clone();
    let onload = Closure::wrap(Box::new(move || {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        {
            let mut host = shared.borrow_mut();
            host.engine.commit_image(ticket, loaded.clone());
        }
        request_frame(&shared);
    }) as Box<dyn FnMut()>);

    let weak = Rc::downgrade(shared);
    let onerror = Closure::wrap(Box::new(move || {
        if let Some(shared) = weak.upgrade() {
            log::warn!("map image failed to decode");
            shared.borrow_mut().engine.fail_image(ticket);
        }
    }) as Box<dyn FnMut()>);

    element.set_onload(Some(onload.as_ref().unchecked_ref()));
    element.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    element.set_src(source);
    shared.borrow_mut().pending_image = Some(PendingImage { element, _onload: onload, _onerror: onerror });
}

/// Listener that downcasts the event, feeds the engine core, and requests a frame.
fn on_event<E: JsCast>(
    weak: &Weak<RefCell<Host>>,
    target: &EventTarget,
    event: &'static str,
    mut handler: impl FnMut(&mut EngineCore, &E) + 'static,
) -> Result<Listener, JsValue> {
    let weak = weak.clone();
    Listener::new(target, event, move |ev: Event| {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        let Some(ev) = ev.dyn_ref::<E>() else {
            return;
        };
        handler(&mut shared.borrow_mut().engine.core, ev);
        request_frame(&shared);
    })
}

fn mouse_point(ev: &MouseEvent) -> (Point, Point) {
    (
        Point::new(f64::from(ev.offset_x()), f64::from(ev.offset_y())),
        Point::new(f64::from(ev.movement_x()), f64::from(ev.movement_y())),
    )
}

/// Keys typed into form fields belong to the page, not the editor.
fn typing_in_field(ev: &Event) -> bool {
    ev.target()
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
        .is_some_and(|el| matches!(el.tag_name().as_str(), "INPUT" | "TEXTAREA" | "SELECT"))
}

fn attach_listeners(shared: &Shared, canvas: &HtmlCanvasElement) -> Result<Vec<Listener>, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let canvas: &EventTarget = canvas.as_ref();
    let window: &EventTarget = window.as_ref();
    let weak = Rc::downgrade(shared);

    Ok(vec![
        on_event(&weak, canvas, "mousemove", |core, ev: &MouseEvent| {
            let (screen, movement) = mouse_point(ev);
            core.on_pointer_move(screen, movement);
        })?,
        on_event(&weak, canvas, "mousedown", |core, ev: &MouseEvent| {
            if let Some(button) = Button::from_dom(ev.button()) {
                core.on_pointer_down(button, Date::now());
            }
        })?,
        // Releases off the canvas still end the gesture.
        on_event(&weak, window, "mouseup", |core, ev: &MouseEvent| {
            if let Some(button) = Button::from_dom(ev.button()) {
                core.on_pointer_up(button);
            }
        })?,
        on_event(&weak, canvas, "mouseleave", |core, _: &MouseEvent| core.on_pointer_leave())?,
        on_event(&weak, canvas, "wheel", |core, ev: &WheelEvent| {
            ev.prevent_default();
            core.on_wheel(ev.delta_y());
        })?,
        Listener::new(canvas, "contextmenu", |ev: Event| ev.prevent_default())?,
        on_event(&weak, window, "keydown", |core, ev: &KeyboardEvent| {
            if !typing_in_field(ev) {
                core.on_key_down(&ev.key(), ev.repeat(), Date::now());
            }
        })?,
        on_event(&weak, window, "keyup", |core, ev: &KeyboardEvent| {
            core.on_key_up(&ev.key(), ev.repeat());
        })?,
    ])
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_id(raw: &str) -> Result<uuid::Uuid, JsValue> {
    uuid::Uuid::parse_str(raw).map_err(js_error)
}

/// Page-facing editor handle.
#[wasm_bindgen]
pub struct EditorHandle {
    shared: Shared,
    _listeners: Vec<Listener>,
}

impl EditorHandle {
    fn edit(&self, f: impl FnOnce(&mut EngineCore)) {
        f(&mut self.shared.borrow_mut().engine.core);
        request_frame(&self.shared);
    }
}

#[wasm_bindgen]
impl EditorHandle {
    /// Mount the editor on `canvas`, restoring the saved snapshot.
    ///
    /// `advisory` is shown while the current map has no image. `config_json`
    /// overrides [`AppConfig`] fields.
    ///
    /// # Errors
    ///
    /// Returns `Err` for invalid config, a canvas without a 2D context, or
    /// listeners that cannot be attached.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        advisory: Option<HtmlElement>,
        config_json: Option<String>,
    ) -> Result<EditorHandle, JsValue> {
        let config = match config_json {
            Some(raw) => AppConfig::from_json(&raw).map_err(js_error)?,
            None => AppConfig::default(),
        };
        let mut engine = Engine::new(canvas.clone(), config.interaction)?;

        let storage = match LocalStorage::open() {
            Ok(storage) => Some(storage),
            Err(e) => {
                log::warn!("saving disabled: {e}");
                None
            }
        };
        let loaded = storage
            .as_ref()
            .map(|s| load_or_default(s, &config.save_key))
            .unwrap_or_default();
        let changelog = ChangelogState::new(CHANGELOG, loaded.changelog_checksum.as_deref());
        engine.core.load(loaded.doc);

        let shared = Rc::new(RefCell::new(Host {
            engine,
            storage,
            config,
            changelog,
            advisory,
            save_timer: None,
            frame_pending: false,
            pending_image: None,
        }));
        let listeners = attach_listeners(&shared, &canvas)?;
        request_frame(&shared);
        Ok(Self { shared, _listeners: listeners })
    }

    /// Add a map and make it current. Returns the new map id.
    #[wasm_bindgen(js_name = newMap)]
    pub fn new_map(&self, name: &str, image: &str) -> String {
        let id = uuid::Uuid::new_v4();
        self.edit(|core| core.new_map(id, name, image));
        id.to_string()
    }

    /// # Errors
    ///
    /// Returns `Err` for a malformed or unknown map id.
    #[wasm_bindgen(js_name = updateMap)]
    pub fn update_map(&self, id: &str, name: &str, image: &str) -> Result<(), JsValue> {
        let id = parse_id(id)?;
        self.shared.borrow_mut().engine.core.update_map(id, name, image).map_err(js_error)?;
        request_frame(&self.shared);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `Err` for a malformed map id.
    #[wasm_bindgen(js_name = deleteMap)]
    pub fn delete_map(&self, id: &str) -> Result<(), JsValue> {
        let id = parse_id(id)?;
        self.edit(|core| core.delete_map(&id));
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `Err` for a malformed map id.
    #[wasm_bindgen(js_name = selectMap)]
    pub fn select_map(&self, id: &str) -> Result<(), JsValue> {
        let id = parse_id(id)?;
        self.edit(|core| core.select_map(&id));
        Ok(())
    }

    #[wasm_bindgen(js_name = setBgColor)]
    pub fn set_bg_color(&self, color: &str) {
        self.edit(|core| core.set_bg_color(color));
    }

    #[wasm_bindgen(js_name = bgColor)]
    pub fn bg_color(&self) -> Option<String> {
        self.shared.borrow().engine.core.bg_color().map(str::to_owned)
    }

    #[wasm_bindgen(js_name = renameActive)]
    pub fn rename_active(&self, name: &str) {
        self.edit(|core| core.rename_active(name));
    }

    /// Focus a location by id, or clear focus with `null`.
    ///
    /// # Errors
    ///
    /// Returns `Err` for a malformed or unknown location id.
    #[wasm_bindgen(js_name = setActive)]
    pub fn set_active(&self, id: Option<String>) -> Result<(), JsValue> {
        let id = id.as_deref().map(parse_id).transpose()?;
        self.shared.borrow_mut().engine.core.set_active(id).map_err(js_error)?;
        request_frame(&self.shared);
        Ok(())
    }

    #[wasm_bindgen(js_name = setActivePosition)]
    pub fn set_active_position(&self, x: f64, y: f64) {
        self.edit(|core| core.set_active_position(x, y));
    }

    /// Set a location's parent, or detach it with `null`.
    ///
    /// # Errors
    ///
    /// Returns `Err` for a malformed or unknown id, or a parent that would
    /// close a cycle.
    #[wasm_bindgen(js_name = setParent)]
    pub fn set_parent(&self, id: &str, parent: Option<String>) -> Result<(), JsValue> {
        let id = parse_id(id)?;
        let parent = parent.as_deref().map(parse_id).transpose()?;
        self.shared.borrow_mut().engine.core.set_parent(id, parent).map_err(js_error)?;
        request_frame(&self.shared);
        Ok(())
    }

    /// Every location on every map as JSON.
    ///
    /// # Errors
    ///
    /// Returns `Err` if encoding fails.
    #[wasm_bindgen(js_name = locationsJson)]
    pub fn locations_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.shared.borrow().engine.core.doc.locations()).map_err(js_error)
    }

    /// Maps as JSON, for the page's map list.
    ///
    /// # Errors
    ///
    /// Returns `Err` if encoding fails.
    #[wasm_bindgen(js_name = mapsJson)]
    pub fn maps_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.shared.borrow().engine.core.doc.maps()).map_err(js_error)
    }

    /// Every root location as EmoTracker JSON.
    ///
    /// # Errors
    ///
    /// Returns `Err` if encoding fails.
    #[wasm_bindgen(js_name = exportAll)]
    pub fn export_all(&self) -> Result<String, JsValue> {
        let host = self.shared.borrow();
        let doc = &host.engine.core.doc;
        let rendered = EmoTrackerExporter.export_locations(doc.maps(), doc.locations()).map_err(js_error)?;
        log::info!("exported {} locations", doc.len());
        Ok(rendered)
    }

    /// The active location alone, or `None` when nothing is active.
    ///
    /// # Errors
    ///
    /// Returns `Err` if encoding fails.
    #[wasm_bindgen(js_name = exportActive)]
    pub fn export_active(&self) -> Result<Option<String>, JsValue> {
        let host = self.shared.borrow();
        let doc = &host.engine.core.doc;
        let Some(location) = doc.active_location_id().and_then(|id| doc.location(&id)) else {
            return Ok(None);
        };
        EmoTrackerExporter
            .export_location(doc.maps(), location, None)
            .map(Some)
            .map_err(js_error)
    }

    /// Whether the changelog changed since the user last saw it.
    #[wasm_bindgen(js_name = changelogUnread)]
    pub fn changelog_unread(&self) -> bool {
        self.shared.borrow().changelog.open
    }

    #[wasm_bindgen(js_name = changelog)]
    pub fn changelog(&self) -> String {
        CHANGELOG.to_owned()
    }

    /// Close the changelog viewer and persist the read state.
    #[wasm_bindgen(js_name = markChangelogRead)]
    pub fn mark_changelog_read(&self) {
        self.shared.borrow_mut().changelog.close();
        schedule_save(&self.shared);
    }
}
