//! Interaction tuning: the single configuration surface for gesture
//! thresholds and camera limits.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{DRAG_THRESHOLD_MS, MARKER_SIZE, MIN_ZOOM, ZOOM_STEP};

/// Error returned by [`InteractionConfig::validate`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A numeric field is NaN, infinite, or outside its allowed range.
    #[error("invalid {field}: {value} ({reason})")]
    InvalidValue { field: &'static str, value: f64, reason: &'static str },
}

/// Thresholds shared by the controller, hit-testing, and renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InteractionConfig {
    /// Hold time (ms) separating a click from a press-and-drag.
    pub drag_threshold_ms: f64,
    /// Pointer travel (world px) separating a click from a rectangle select.
    pub drag_distance: f64,
    /// Marker glyph side length (world px); also the hit box.
    pub marker_size: f64,
    /// Zoom delta applied for each frame with wheel movement.
    pub zoom_step: f64,
    /// Zoom floor.
    pub min_zoom: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            drag_threshold_ms: DRAG_THRESHOLD_MS,
            drag_distance: MARKER_SIZE,
            marker_size: MARKER_SIZE,
            zoom_step: ZOOM_STEP,
            min_zoom: MIN_ZOOM,
        }
    }
}

impl InteractionConfig {
    /// Check every field is finite and in range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("dragThresholdMs", self.drag_threshold_ms)?;
        non_negative("dragDistance", self.drag_distance)?;
        positive("markerSize", self.marker_size)?;
        positive("zoomStep", self.zoom_step)?;
        positive("minZoom", self.min_zoom)?;
        Ok(())
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::InvalidValue { field, value, reason: "must be finite" });
    }
    if value < 0.0 {
        return Err(ConfigError::InvalidValue { field, value, reason: "must not be negative" });
    }
    Ok(())
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    non_negative(field, value)?;
    if value <= 0.0 {
        return Err(ConfigError::InvalidValue { field, value, reason: "must be greater than zero" });
    }
    Ok(())
}
