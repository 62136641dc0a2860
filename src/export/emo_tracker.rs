//! EmoTracker location JSON.
//!
//! Each location becomes
//! `{ "name", "map_locations": [{ "map", "x", "y" }], "children": [...] }`,
//! pretty-printed with four-space indentation.

#[cfg(test)]
#[path = "emo_tracker_test.rs"]
mod emo_tracker_test;

use std::collections::HashSet;

use canvas::doc::{Location, LocationId, MapData};
use serde::Serialize;

use super::{ExportError, Exporter};

/// Map name written when a location's map no longer exists.
pub const UNKNOWN_MAP: &str = "UNKNOWN";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackerLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub map_locations: Vec<MapLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TrackerLocation>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapLocation {
    pub map: String,
    pub x: i64,
    pub y: i64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EmoTrackerExporter;

impl EmoTrackerExporter {
    /// Build the tracker tree for `location`.
    ///
    /// `visited` guards against parent cycles in loaded data: a location
    /// already on the path is emitted without children.
    fn convert(
        maps: &[MapData],
        location: &Location,
        all: Option<&[Location]>,
        visited: &mut HashSet<LocationId>,
    ) -> TrackerLocation {
        let map = maps
            .iter()
            .find(|m| m.id == location.map)
            .map_or_else(|| UNKNOWN_MAP.to_owned(), |m| m.name.clone());

        let children = all.map(|all| {
            if !visited.insert(location.id) {
                log::warn!("parent cycle at location {}, truncating export", location.id);
                return Vec::new();
            }
            let kids = all
                .iter()
                .filter(|l| l.parent_id == Some(location.id))
                .map(|child| Self::convert(maps, child, Some(all), visited))
                .collect();
            visited.remove(&location.id);
            kids
        });

        TrackerLocation {
            name: location.name.clone(),
            map_locations: vec![MapLocation { map, x: location.x, y: location.y }],
            children,
        }
    }

    /// Tracker trees for every root location.
    #[must_use]
    pub fn roots(maps: &[MapData], locations: &[Location]) -> Vec<TrackerLocation> {
        let mut visited = HashSet::new();
        locations
            .iter()
            .filter(|l| l.parent_id.is_none())
            .map(|l| Self::convert(maps, l, Some(locations), &mut visited))
            .collect()
    }
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, ExportError> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut ser)?;
    // serde_json only ever writes valid UTF-8.
    Ok(String::from_utf8_lossy(&out).into_owned())
}

impl Exporter for EmoTrackerExporter {
    fn name(&self) -> &'static str {
        "EmoTracker"
    }

    fn export_location(
        &self,
        maps: &[MapData],
        location: &Location,
        descendants: Option<&[Location]>,
    ) -> Result<String, ExportError> {
        let tree = Self::convert(maps, location, descendants, &mut HashSet::new());
        to_pretty_json(&tree)
    }

    fn export_locations(&self, maps: &[MapData], locations: &[Location]) -> Result<String, ExportError> {
        let roots = Self::roots(maps, locations);
        log::info!("exported {} root locations", roots.len());
        to_pretty_json(&roots)
    }
}
