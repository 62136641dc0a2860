//! Shared numeric constants for the canvas crate.
//!
//! These are the defaults behind [`crate::config::InteractionConfig`]; code
//! that needs a tunable reads the config, not these values directly.

// ── Gestures ────────────────────────────────────────────────────

/// Hold time in milliseconds before a press on a marker becomes a move.
pub const DRAG_THRESHOLD_MS: f64 = 300.0;

/// Side length of a marker glyph, in world pixels.
pub const MARKER_SIZE: f64 = 8.0;

// ── Camera ──────────────────────────────────────────────────────

/// Zoom change applied per wheel frame.
pub const ZOOM_STEP: f64 = 0.25;

/// Lowest zoom factor the camera accepts.
pub const MIN_ZOOM: f64 = 0.1;

// ── Relationship arrows ─────────────────────────────────────────

/// Arrowhead radius in world pixels.
pub const ARROW_HEAD_RADIUS: f64 = 4.0;

/// Gap between an arrowhead and the edge of the marker it points at.
pub const ARROW_TRAIL_GAP: f64 = 2.0;

/// World-space offset from a marker to the anchor of a cross-map stub arrow.
pub const STUB_OFFSET: f64 = 24.0;

// ── Colors ──────────────────────────────────────────────────────

pub const POINTER_DOT_COLOR: &str = "rgba(0,0,0,0.25)";
pub const SELECTION_RECT_COLOR: &str = "rgba(255,255,255,0.8)";
pub const EDGE_COLOR: &str = "white";
pub const EDGE_DIM_COLOR: &str = "rgba(255, 255, 255, 0.25)";
pub const SHADOW_COLOR: &str = "black";
pub const SHADOW_BLUR: f64 = 10.0;
pub const STUB_LABEL_FONT: &str = "10px sans-serif";
