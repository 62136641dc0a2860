#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn empty_object_is_all_defaults() {
    let config = AppConfig::from_json("{}").unwrap();
    assert_eq!(config, AppConfig::default());
    assert_eq!(config.save_key, "save-data");
    assert_eq!(config.save_debounce_ms, 500);
    assert!(config.strip_images_on_quota);
}

#[test]
fn nested_interaction_overrides_merge_with_defaults() {
    let config = AppConfig::from_json(r#"{"saveDebounceMs": 1000, "interaction": {"zoomStep": 0.5}}"#).unwrap();
    assert_eq!(config.save_debounce_ms, 1000);
    assert_eq!(config.interaction.zoom_step, 0.5);
    assert_eq!(config.interaction.drag_threshold_ms, 300.0);
}

#[test]
fn invalid_interaction_is_rejected() {
    let err = AppConfig::from_json(r#"{"interaction": {"minZoom": -1}}"#).unwrap_err();
    assert!(matches!(err, AppConfigError::Interaction(_)));
}

#[test]
fn empty_save_key_is_rejected() {
    let err = AppConfig::from_json(r#"{"saveKey": ""}"#).unwrap_err();
    assert!(matches!(err, AppConfigError::EmptySaveKey));
}

#[test]
fn malformed_json_is_rejected() {
    assert!(matches!(AppConfig::from_json("{"), Err(AppConfigError::Json(_))));
}
