//! Canvas engine for the map-annotation editor.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! full lifecycle of the editing surface: folding raw DOM input into frame
//! state, turning each frame into document intents, maintaining the pan/zoom
//! camera, hit-testing markers, and drawing the scene. The host layer is
//! responsible only for wiring DOM events to the engine, scheduling frames,
//! decoding images, and persisting the document when an
//! [`engine::Action::DocChanged`] comes back.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`controller`] | Per-frame gesture decisions, emitting [`doc::Intent`]s |
//! | [`doc`] | Maps, locations, and the document store |
//! | [`camera`] | Pan/zoom camera and coordinate conversions |
//! | [`input`] | Keyboard and mouse frame state |
//! | [`hit`] | Hit-testing against markers |
//! | [`geometry`] | Distances, rounding, rectangles, arrows |
//! | [`scene`] | Pure draw-list planning |
//! | [`render`] | Canvas2D drawing of a planned scene |
//! | [`image`] | Background image slot with stale-load guard |
//! | [`config`] | Interaction thresholds |
//! | [`consts`] | Shared numeric constants and colors |

pub mod camera;
pub mod config;
pub mod consts;
pub mod controller;
pub mod doc;
pub mod engine;
pub mod geometry;
pub mod hit;
pub mod image;
pub mod input;
pub mod render;
pub mod scene;
